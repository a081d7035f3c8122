//! Player input state and scripted input playback.

use serde::{Deserialize, Serialize};

/// Button state for the Game Gear's D-pad, two action buttons and START.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Button 1 (left action button)
    pub one: bool,
    /// Button 2 (right action button)
    pub two: bool,
    pub start: bool,
}

impl Buttons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set button state by name (for scripting and tests).
    pub fn set_button(&mut self, button: &str, pressed: bool) {
        match button.to_lowercase().as_str() {
            "up" => self.up = pressed,
            "down" => self.down = pressed,
            "left" => self.left = pressed,
            "right" => self.right = pressed,
            "1" | "one" => self.one = pressed,
            "2" | "two" => self.two = pressed,
            "start" => self.start = pressed,
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One scripted button transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Frame number at which the transition applies.
    pub frame: u64,
    pub button: String,
    pub pressed: bool,
}

/// A recorded input sequence for deterministic headless runs: a list of
/// button transitions sorted by frame.
#[derive(Debug, Default)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by_key(|e| e.frame);
        Self { events, cursor: 0 }
    }

    /// Parse a script from its JSON form: `[{"frame":N,"button":"start",
    /// "pressed":true}, ...]`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let events: Vec<ScriptEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    pub fn from_file(path: &str) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Apply every event scheduled at or before `frame`.
    pub fn apply(&mut self, frame: u64, buttons: &mut Buttons) {
        while let Some(event) = self.events.get(self.cursor) {
            if event.frame > frame {
                break;
            }
            buttons.set_button(&event.button, event.pressed);
            self.cursor += 1;
        }
    }

    /// True once every event has been applied.
    pub fn finished(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_button_by_name() {
        let mut b = Buttons::new();
        b.set_button("start", true);
        b.set_button("1", true);
        assert!(b.start);
        assert!(b.one);
        b.set_button("START", false);
        assert!(!b.start);
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut b = Buttons::new();
        b.set_button("c", true);
        assert!(!b.one && !b.two && !b.start);
    }

    #[test]
    fn script_applies_events_in_frame_order() {
        let mut script = InputScript::from_json(
            r#"[
                {"frame": 2, "button": "start", "pressed": true},
                {"frame": 0, "button": "right", "pressed": true},
                {"frame": 3, "button": "start", "pressed": false}
            ]"#,
        )
        .unwrap();
        let mut buttons = Buttons::new();

        script.apply(0, &mut buttons);
        assert!(buttons.right);
        assert!(!buttons.start);

        script.apply(2, &mut buttons);
        assert!(buttons.start);

        script.apply(3, &mut buttons);
        assert!(!buttons.start);
        assert!(script.finished());
    }

    #[test]
    fn apply_catches_up_over_skipped_frames() {
        let mut script = InputScript::from_json(
            r#"[{"frame": 1, "button": "up", "pressed": true},
                {"frame": 2, "button": "down", "pressed": true}]"#,
        )
        .unwrap();
        let mut buttons = Buttons::new();
        script.apply(10, &mut buttons);
        assert!(buttons.up);
        assert!(buttons.down);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(InputScript::from_json("not json").is_err());
    }
}
