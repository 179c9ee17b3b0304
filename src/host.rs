//! Boundary to the page hosting a game
//!
//! The host shows score, lives, level and a status banner next to the
//! canvas. Sound and celebration effects are optional collaborators: they may
//! fail, and a failure never interrupts the game.

use crate::audio::SoundEffect;
use crate::error::{ArcadeError, Result};
use crate::sim::{HostEvent, ScoreDisplay, Severity};

pub trait Host {
    fn update_score(&mut self, score: &ScoreDisplay);
    fn update_lives(&mut self, lives: u32);
    fn update_level(&mut self, level: u32);
    fn show_status(&mut self, message: &str, severity: Severity);
    fn hide_status(&mut self);

    fn play_sound(&mut self, _effect: SoundEffect) -> Result<()> {
        Ok(())
    }

    /// Celebration effect at a canvas pixel position
    fn celebrate(&mut self, _x: f32, _y: f32) -> Result<()> {
        Ok(())
    }
}

/// Deliver one event to the host. Collaborator failures are logged and dropped.
pub fn dispatch<H: Host + ?Sized>(host: &mut H, event: &HostEvent) {
    match event {
        HostEvent::Score(score) => host.update_score(score),
        HostEvent::Lives(lives) => host.update_lives(*lives),
        HostEvent::Level(level) => host.update_level(*level),
        HostEvent::Status { message, severity } => host.show_status(message, *severity),
        HostEvent::HideStatus => host.hide_status(),
        HostEvent::Sound(effect) => {
            if let Err(e) = host.play_sound(*effect) {
                log::warn!("Sound {effect:?} failed: {e}");
            }
        }
        HostEvent::Celebrate { x, y } => {
            if let Err(e) = host.celebrate(*x, *y) {
                log::warn!("Celebration failed: {e}");
            }
        }
    }
}

/// Host that records everything it is told (tests and headless runs)
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    /// Make sound and celebration calls fail
    pub failing_collaborators: bool,
}

impl RecordingHost {
    pub fn failing() -> Self {
        Self {
            events: Vec::new(),
            failing_collaborators: true,
        }
    }

    pub fn last_score(&self) -> Option<ScoreDisplay> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Score(s) => Some(*s),
            _ => None,
        })
    }

    pub fn last_lives(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Lives(l) => Some(*l),
            _ => None,
        })
    }

    pub fn last_level(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Level(l) => Some(*l),
            _ => None,
        })
    }

    /// Status banner currently up, if any
    pub fn status(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            HostEvent::Status { message, .. } => Some(Some(message.as_str())),
            HostEvent::HideStatus => Some(None),
            _ => None,
        })?
    }

    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Host for RecordingHost {
    fn update_score(&mut self, score: &ScoreDisplay) {
        self.events.push(HostEvent::Score(*score));
    }

    fn update_lives(&mut self, lives: u32) {
        self.events.push(HostEvent::Lives(lives));
    }

    fn update_level(&mut self, level: u32) {
        self.events.push(HostEvent::Level(level));
    }

    fn show_status(&mut self, message: &str, severity: Severity) {
        self.events.push(HostEvent::Status {
            message: message.to_string(),
            severity,
        });
    }

    fn hide_status(&mut self) {
        self.events.push(HostEvent::HideStatus);
    }

    fn play_sound(&mut self, effect: SoundEffect) -> Result<()> {
        if self.failing_collaborators {
            return Err(ArcadeError::Collaborator("no audio device".into()));
        }
        self.events.push(HostEvent::Sound(effect));
        Ok(())
    }

    fn celebrate(&mut self, x: f32, y: f32) -> Result<()> {
        if self.failing_collaborators {
            return Err(ArcadeError::Collaborator("effects unavailable".into()));
        }
        self.events.push(HostEvent::Celebrate { x, y });
        Ok(())
    }
}

/// Host that writes everything to the log (native CLI)
#[derive(Debug, Default)]
pub struct LogHost;

impl Host for LogHost {
    fn update_score(&mut self, score: &ScoreDisplay) {
        log::info!("Score: {score}");
    }

    fn update_lives(&mut self, lives: u32) {
        log::info!("Lives: {lives}");
    }

    fn update_level(&mut self, level: u32) {
        log::info!("Level: {level}");
    }

    fn show_status(&mut self, message: &str, severity: Severity) {
        log::info!("[{severity:?}] {message}");
    }

    fn hide_status(&mut self) {
        log::debug!("Status hidden");
    }

    fn play_sound(&mut self, effect: SoundEffect) -> Result<()> {
        log::debug!("Sound: {effect:?}");
        Ok(())
    }

    fn celebrate(&mut self, x: f32, y: f32) -> Result<()> {
        log::debug!("Celebrate at ({x:.0}, {y:.0})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_collaborators_do_not_stop_dispatch() {
        let mut host = RecordingHost::failing();
        dispatch(&mut host, &HostEvent::Sound(SoundEffect::Eat));
        dispatch(&mut host, &HostEvent::Celebrate { x: 1.0, y: 2.0 });
        dispatch(&mut host, &HostEvent::Lives(2));
        assert_eq!(host.events, vec![HostEvent::Lives(2)]);
    }

    #[test]
    fn test_status_tracks_hide() {
        let mut host = RecordingHost::default();
        host.show_status("Paused", Severity::Warning);
        assert_eq!(host.status(), Some("Paused"));
        host.hide_status();
        assert_eq!(host.status(), None);
    }
}
