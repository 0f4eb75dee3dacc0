//! Key-event to intent translation.
//!
//! UI layers feed raw key-down/key-up events in; the tracker turns them
//! into the minimal set of change notifications. It is deliberately free of
//! I/O so it can sit in any event loop (or a test) unchanged.

/// Physical keys the game reacts to. Two conventional bindings per
/// direction, plus the pause/start key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    KeyW,
    ArrowDown,
    KeyS,
    Space,
}

/// A change the tracker wants acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Directional intent changed. Both flags may be true at once; the
    /// simulation treats that as a cancel.
    Intent { up: bool, down: bool },
    /// The pause/start key went from released to pressed.
    TogglePause,
}

/// Debounced keyboard state.
///
/// Directional events only fire when the *derived* intent changes, so OS
/// key-repeat and redundant key-downs produce nothing. The pause key is
/// edge-triggered: it fires once per physical press, however many repeat
/// key-downs the OS delivers while it is held.
#[derive(Debug, Default)]
pub struct InputTracker {
    arrow_up: bool,
    key_w: bool,
    arrow_down: bool,
    key_s: bool,
    space: bool,
    last_intent: (bool, bool),
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press. Returns the event to act on, if any.
    pub fn key_down(&mut self, key: Key) -> Option<InputEvent> {
        if key == Key::Space {
            if self.space {
                return None; // OS auto-repeat
            }
            self.space = true;
            return Some(InputEvent::TogglePause);
        }
        self.set_held(key, true);
        self.intent_change()
    }

    /// Records a key release. Returns the event to act on, if any.
    pub fn key_up(&mut self, key: Key) -> Option<InputEvent> {
        if key == Key::Space {
            self.space = false;
            return None;
        }
        self.set_held(key, false);
        self.intent_change()
    }

    /// The intent derived from the currently held keys.
    pub fn intent(&self) -> (bool, bool) {
        (
            self.arrow_up || self.key_w,
            self.arrow_down || self.key_s,
        )
    }

    fn set_held(&mut self, key: Key, held: bool) {
        match key {
            Key::ArrowUp => self.arrow_up = held,
            Key::KeyW => self.key_w = held,
            Key::ArrowDown => self.arrow_down = held,
            Key::KeyS => self.key_s = held,
            Key::Space => {}
        }
    }

    fn intent_change(&mut self) -> Option<InputEvent> {
        let intent = self.intent();
        if intent == self.last_intent {
            return None;
        }
        self.last_intent = intent;
        let (up, down) = intent;
        Some(InputEvent::Intent { up, down })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_up() {
        let mut tracker = InputTracker::new();
        assert_eq!(
            tracker.key_down(Key::ArrowUp),
            Some(InputEvent::Intent { up: true, down: false })
        );
        assert_eq!(
            tracker.key_up(Key::ArrowUp),
            Some(InputEvent::Intent { up: false, down: false })
        );
    }

    #[test]
    fn test_key_repeat_produces_no_duplicate() {
        let mut tracker = InputTracker::new();
        assert!(tracker.key_down(Key::KeyS).is_some());
        // OS repeat delivers the same key-down again and again.
        assert_eq!(tracker.key_down(Key::KeyS), None);
        assert_eq!(tracker.key_down(Key::KeyS), None);
    }

    #[test]
    fn test_alternate_binding_keeps_intent() {
        let mut tracker = InputTracker::new();
        assert!(tracker.key_down(Key::ArrowUp).is_some());
        // W pressed while ArrowUp is held: intent is already up.
        assert_eq!(tracker.key_down(Key::KeyW), None);
        // Releasing one of the two bindings keeps intent up.
        assert_eq!(tracker.key_up(Key::ArrowUp), None);
        assert_eq!(
            tracker.key_up(Key::KeyW),
            Some(InputEvent::Intent { up: false, down: false })
        );
    }

    #[test]
    fn test_opposing_keys_both_reported() {
        let mut tracker = InputTracker::new();
        tracker.key_down(Key::ArrowUp);
        assert_eq!(
            tracker.key_down(Key::ArrowDown),
            Some(InputEvent::Intent { up: true, down: true })
        );
    }

    #[test]
    fn test_space_is_edge_triggered() {
        let mut tracker = InputTracker::new();
        assert_eq!(tracker.key_down(Key::Space), Some(InputEvent::TogglePause));
        // Held: repeats are swallowed.
        assert_eq!(tracker.key_down(Key::Space), None);
        assert_eq!(tracker.key_down(Key::Space), None);
        // Release then press fires again.
        assert_eq!(tracker.key_up(Key::Space), None);
        assert_eq!(tracker.key_down(Key::Space), Some(InputEvent::TogglePause));
    }

    #[test]
    fn test_space_does_not_touch_intent() {
        let mut tracker = InputTracker::new();
        tracker.key_down(Key::ArrowDown);
        tracker.key_down(Key::Space);
        assert_eq!(tracker.intent(), (false, true));
    }
}
