use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// `InputState` holds the current state (held keys, pointer position);
/// `InputFrame` holds the key presses since the last frame. It only ever
/// contains distinct keys, so it stays bounded however long a window goes
/// without a redraw.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub(super) keys_pressed: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }

    pub(crate) fn record_press(&mut self, key: Key) {
        self.keys_pressed.insert(key);
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
