//! Error types for the arcade crate
//!
//! Gameplay itself never fails: illegal moves are ignored and running out of
//! lives is a normal state transition. Errors only cross the boundaries with
//! the outside world (board templates, settings, drawing surfaces, optional
//! collaborators, the browser).

use thiserror::Error;

/// The main error type for arcade operations
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Malformed board at row {row}: {reason}")]
    Board { row: usize, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Collaborator unavailable: {0}")]
    Collaborator(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result type alias for arcade operations
pub type Result<T> = std::result::Result<T, ArcadeError>;
