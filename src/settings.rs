//! Player settings and preferences
//!
//! The only state the arcade persists. Stored in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::START_LIVES;
use crate::error::Result;
use crate::sim::EdgeMode;

/// Operations Number Defenders asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MathMode {
    Add,
    Sub,
    #[default]
    Both,
}

impl MathMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MathMode::Add => "Addition",
            MathMode::Sub => "Subtraction",
            MathMode::Both => "Mixed",
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no celebration effects)
    pub reduced_motion: bool,

    // === Per-game ===
    /// Wormy board edges: solid walls or wraparound
    pub wormy_edges: EdgeMode,
    pub math_mode: MathMode,
    /// Number Defenders session length in seconds, 0 for untimed
    pub math_time_limit_secs: u32,
    /// Lives at the start of a run, for games with lives
    pub start_lives: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,

            reduced_motion: false,

            wormy_edges: EdgeMode::Solid,
            math_mode: MathMode::Both,
            math_time_limit_secs: 180,
            start_lives: START_LIVES,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.start_lives = settings.start_lives.clamp(1, 9);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether celebration effects should be requested
    pub fn celebrations(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "retro_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<()> {
        use crate::error::ArcadeError;

        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ArcadeError::Platform("LocalStorage unavailable".into()))?;
        storage
            .set_item(Self::STORAGE_KEY, &self.to_json()?)
            .map_err(|e| ArcadeError::Platform(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<()> {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"muted":true,"wormy_edges":"wrap"}"#).unwrap();
        assert!(s.muted);
        assert_eq!(s.wormy_edges, EdgeMode::Wrap);
        assert_eq!(s.math_time_limit_secs, 180);
        assert_eq!(s.start_lives, 3);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let s = Settings::from_json(r#"{"master_volume":4.0,"start_lives":0}"#).unwrap();
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.start_lives, 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.math_mode = MathMode::Sub;
        s.reduced_motion = true;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
        assert!(!back.celebrations());
    }
}
