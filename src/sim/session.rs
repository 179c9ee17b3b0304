//! Game session state machine and host-bound event outbox
//!
//! A session is the mutable bundle of phase/score/lives/level for one
//! play-through. Every change that the host must display is pushed into the
//! outbox as a [`HostEvent`]; the runner drains it into the host before the
//! frame is rendered, so the host sees each change within the same tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen, waiting for the start action
    Menu,
    /// Active gameplay, ticks are running
    Playing,
    /// Ticks are stopped until resume
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Severity of a status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// What the host's score display should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreDisplay {
    Points(u64),
    /// Two-player match score
    Versus { left: u32, right: u32 },
}

impl fmt::Display for ScoreDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreDisplay::Points(points) => write!(f, "{points}"),
            ScoreDisplay::Versus { left, right } => write!(f, "{left} - {right}"),
        }
    }
}

/// Fire-and-forget notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HostEvent {
    Score(ScoreDisplay),
    Lives(u32),
    Level(u32),
    Status { message: String, severity: Severity },
    HideStatus,
    Sound(SoundEffect),
    /// Request a celebration effect centered on a canvas pixel position
    Celebrate { x: f32, y: f32 },
}

/// One play-through of a game
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    phase: GamePhase,
    score: u64,
    lives: u32,
    level: u32,
    start_lives: u32,
    tracks_lives: bool,
    /// Remaining time before a timed status banner is hidden
    status_ms: Option<u32>,
    #[serde(skip)]
    outbox: Vec<HostEvent>,
}

impl Session {
    /// Create a session in the `Menu` phase. `None` lives means the game
    /// has no lives counter (the session still holds one hidden life).
    pub fn new(start_lives: Option<u32>) -> Self {
        let (start_lives, tracks_lives) = match start_lives {
            Some(lives) => (lives.max(1), true),
            None => (1, false),
        };
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: start_lives,
            level: 1,
            start_lives,
            tracks_lives,
            status_ms: None,
            outbox: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tracks_lives(&self) -> bool {
        self.tracks_lives
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Fresh run: zero score, full lives, level 1, phase `Playing`.
    pub fn begin(&mut self) {
        self.score = 0;
        self.lives = self.start_lives;
        self.level = 1;
        self.phase = GamePhase::Playing;
        self.status_ms = None;
        self.outbox.push(HostEvent::HideStatus);
        self.outbox.push(HostEvent::Score(ScoreDisplay::Points(0)));
        if self.tracks_lives {
            self.outbox.push(HostEvent::Lives(self.lives));
        }
        self.outbox.push(HostEvent::Level(self.level));
    }

    /// `Playing -> Paused`. Returns false (and emits nothing) from any other phase.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.status_ms = None;
        self.outbox.push(HostEvent::Status {
            message: "Game Paused - Press SPACE to resume".to_string(),
            severity: Severity::Warning,
        });
        true
    }

    /// `Paused -> Playing`. Returns false from any other phase.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.outbox.push(HostEvent::HideStatus);
        true
    }

    /// Add points for a scoring event
    pub fn award(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.outbox.push(HostEvent::Score(ScoreDisplay::Points(self.score)));
    }

    /// Add one point to a two-player match and report the match score
    pub fn award_versus(&mut self, left: u32, right: u32) {
        self.score = self.score.saturating_add(1);
        self.outbox.push(HostEvent::Score(ScoreDisplay::Versus { left, right }));
    }

    /// Explicit score reset in the middle of a run (e.g. resetting a match)
    pub fn reset_score(&mut self, display: ScoreDisplay) {
        self.score = 0;
        self.outbox.push(HostEvent::Score(display));
    }

    /// Report a score display without changing the score (initial match score)
    pub fn report_score(&mut self, display: ScoreDisplay) {
        self.outbox.push(HostEvent::Score(display));
    }

    /// Lose one life. Reaching zero ends the run within the same call.
    /// Returns true when the run is over.
    pub fn lose_life(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return self.phase == GamePhase::GameOver;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.tracks_lives {
            self.outbox.push(HostEvent::Lives(self.lives));
        }
        if self.lives == 0 {
            self.end_game("Game Over");
            true
        } else {
            self.outbox.push(HostEvent::Sound(SoundEffect::LifeLost));
            false
        }
    }

    /// `Playing -> GameOver` with a banner message
    pub fn end_game(&mut self, message: &str) {
        if self.phase != GamePhase::Playing {
            return;
        }
        log::info!("Game over ({message}), final score {}", self.score);
        self.phase = GamePhase::GameOver;
        self.status_ms = None;
        self.outbox.push(HostEvent::Status {
            message: format!("{message} - Press SPACE to play again"),
            severity: Severity::Error,
        });
        self.outbox.push(HostEvent::Sound(SoundEffect::GameOver));
    }

    pub fn set_level(&mut self, level: u32) {
        let level = level.max(1);
        if level != self.level {
            self.level = level;
            self.outbox.push(HostEvent::Level(level));
        }
    }

    /// Bump the level and show the timed "Level N Complete!" banner
    pub fn complete_level(&mut self) {
        let finished = self.level;
        self.set_level(finished + 1);
        self.show_status(
            &format!("Level {finished} Complete!"),
            Severity::Success,
            Some(crate::consts::LEVEL_BANNER_MS),
        );
        self.sound(SoundEffect::LevelUp);
    }

    /// Show a status banner, optionally hidden again after `hide_after_ms`
    pub fn show_status(&mut self, message: &str, severity: Severity, hide_after_ms: Option<u32>) {
        self.status_ms = hide_after_ms;
        self.outbox.push(HostEvent::Status {
            message: message.to_string(),
            severity,
        });
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.outbox.push(HostEvent::Sound(effect));
    }

    pub fn celebrate(&mut self, x: f32, y: f32) {
        self.outbox.push(HostEvent::Celebrate { x, y });
    }

    /// Advance banner timers by one tick
    pub fn elapse(&mut self, dt_ms: u32) {
        if let Some(remaining) = self.status_ms {
            if remaining <= dt_ms {
                self.status_ms = None;
                self.outbox.push(HostEvent::HideStatus);
            } else {
                self.status_ms = Some(remaining - dt_ms);
            }
        }
    }

    /// Take all pending host events in emission order
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Peek at pending host events (tests and debugging)
    pub fn pending_events(&self) -> &[HostEvent] {
        &self.outbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(lives: u32) -> Session {
        let mut s = Session::new(Some(lives));
        s.begin();
        s.drain_events();
        s
    }

    #[test]
    fn test_starts_in_menu() {
        let s = Session::new(Some(3));
        assert_eq!(s.phase(), GamePhase::Menu);
        assert_eq!((s.score(), s.lives(), s.level()), (0, 3, 1));
    }

    #[test]
    fn test_begin_reports_everything() {
        let mut s = Session::new(Some(3));
        s.begin();
        let events = s.drain_events();
        assert!(events.contains(&HostEvent::Score(ScoreDisplay::Points(0))));
        assert!(events.contains(&HostEvent::Lives(3)));
        assert!(events.contains(&HostEvent::Level(1)));
    }

    #[test]
    fn test_untracked_lives_not_reported() {
        let mut s = Session::new(None);
        s.begin();
        assert!(!s.drain_events().iter().any(|e| matches!(e, HostEvent::Lives(_))));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut s = playing(3);
        assert!(s.pause());
        assert_eq!(s.drain_events().len(), 1);
        assert!(!s.pause());
        assert!(s.drain_events().is_empty());
        assert_eq!(s.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut s = playing(3);
        assert!(!s.resume());
        s.pause();
        assert!(s.resume());
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game_same_call() {
        let mut s = playing(2);
        assert!(!s.lose_life());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.lose_life());
        assert_eq!(s.lives(), 0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        // Further losses are ignored
        assert!(s.lose_life());
        assert_eq!(s.lives(), 0);
    }

    #[test]
    fn test_award_reports_running_total() {
        let mut s = playing(3);
        s.award(10);
        s.award(0);
        s.award(50);
        let scores: Vec<_> = s
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Score(ScoreDisplay::Points(p)) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(scores, vec![10, 60]);
    }

    #[test]
    fn test_level_banner_hides_after_timeout() {
        let mut s = playing(3);
        s.complete_level();
        assert_eq!(s.level(), 2);
        s.drain_events();
        s.elapse(1000);
        assert!(s.drain_events().is_empty());
        s.elapse(1000);
        assert_eq!(s.drain_events(), vec![HostEvent::HideStatus]);
    }

    #[test]
    fn test_versus_display() {
        assert_eq!(ScoreDisplay::Versus { left: 3, right: 7 }.to_string(), "3 - 7");
        assert_eq!(ScoreDisplay::Points(120).to_string(), "120");
    }
}
