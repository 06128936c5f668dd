use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and the last-known pointer position.
/// New key presses are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in physical window pixels. `None` once the pointer
    /// leaves the window.
    pub pointer_pos: Option<(f32, f32)>,

    keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes presses to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(false) => {
                // Avoid stuck keys when focus changes mid-press.
                self.keys_down.clear();
            }
            InputEvent::Focused(true) => {}

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.record_press(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state }
    }

    #[test]
    fn press_is_recorded_once_while_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        assert!(frame.pressed(Key::Escape));
        frame.clear();

        // Key-repeat of an already held key is not a new press.
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        assert!(!frame.pressed(Key::Escape));
        assert!(state.key_down(Key::Escape));

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Released));
        assert!(!state.key_down(Key::Escape));
    }

    #[test]
    fn pointer_is_tracked_until_it_leaves() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(
            &mut frame,
            InputEvent::PointerMoved(PointerMoveEvent { x: 12.0, y: 34.0 }),
        );
        assert_eq!(state.pointer_pos, Some((12.0, 34.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.key_down(Key::Escape));

        // Pressing again after refocus counts as a fresh press.
        frame.clear();
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        assert!(frame.pressed(Key::Escape));
    }

    #[test]
    fn pointer_motion_between_redraws_does_not_accumulate() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        for i in 0..10_000 {
            state.apply_event(
                &mut frame,
                InputEvent::PointerMoved(PointerMoveEvent { x: i as f32, y: 0.0 }),
            );
            state.apply_event(&mut frame, key(Key::Other, KeyState::Pressed));
            state.apply_event(&mut frame, key(Key::Other, KeyState::Released));
        }
        assert_eq!(state.pointer_pos, Some((9_999.0, 0.0)));
        assert_eq!(frame.keys_pressed.len(), 1);
    }
}
