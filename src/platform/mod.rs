//! Platform glue
//!
//! The browser side lives in [`web`]: scoped DOM listeners, the interval
//! timer driving the runner, the DOM host and the exported `WebArcade`
//! handle. Everything else here is shared with the headless runner.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{DomHost, IntervalTimer, Listener, WebArcade};

use crate::error::{ArcadeError, Result};
use crate::sim::{InputEvent, Key};

/// Keyboard event from a browser key name. Unknown names yield `None`.
pub fn key_event(name: &str, down: bool) -> Option<InputEvent> {
    let key = Key::from_name(name)?;
    Some(if down {
        InputEvent::KeyDown(key)
    } else {
        InputEvent::KeyUp(key)
    })
}

/// A key press scheduled for a given tick of a headless run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedKey {
    pub tick: u64,
    pub key: Key,
}

/// Parse a comma separated script of `Key@tick` presses, e.g.
/// `"ArrowUp@10,Space@12"`. The result is ordered by tick.
pub fn parse_script(script: &str) -> Result<Vec<ScriptedKey>> {
    let mut keys = Vec::new();
    for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, tick) = token
            .rsplit_once('@')
            .ok_or_else(|| ArcadeError::Platform(format!("missing @tick in '{token}'")))?;
        let tick = tick
            .parse::<u64>()
            .map_err(|e| ArcadeError::Platform(format!("bad tick in '{token}': {e}")))?;
        let key = Key::from_name(name)
            .ok_or_else(|| ArcadeError::Platform(format!("unknown key '{name}'")))?;
        keys.push(ScriptedKey { tick, key });
    }
    keys.sort_by_key(|k| k.tick);
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_names() {
        assert_eq!(key_event("ArrowLeft", true), Some(InputEvent::KeyDown(Key::ArrowLeft)));
        assert_eq!(key_event(" ", false), Some(InputEvent::KeyUp(Key::Space)));
        assert_eq!(key_event("Q", true), Some(InputEvent::KeyDown(Key::Char('q'))));
        assert_eq!(key_event("Shift", true), None);
    }

    #[test]
    fn test_script_sorted_by_tick() {
        let script = parse_script("ArrowUp@10, Space@2,a@5").unwrap();
        let ticks: Vec<u64> = script.iter().map(|k| k.tick).collect();
        assert_eq!(ticks, vec![2, 5, 10]);
        assert_eq!(script[0].key, Key::Space);
        assert_eq!(script[1].key, Key::Char('a'));
    }

    #[test]
    fn test_script_errors() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("ArrowUp").is_err());
        assert!(parse_script("ArrowUp@soon").is_err());
        assert!(parse_script("Shift@3").is_err());
    }

    #[test]
    fn test_script_handles_at_key() {
        let script = parse_script("@@4").unwrap();
        assert_eq!(script[0].key, Key::Char('@'));
        assert_eq!(script[0].tick, 4);
    }
}
