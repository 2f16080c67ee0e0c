use super::events::{KeyState, PressedDirections, RawInputEvent};
use crate::models::engine::Direction;
use std::collections::{HashMap, HashSet};

/// Maps raw key events to direction presses, edge-triggered.
pub struct InputManager {
    bindings: HashMap<String, Direction>,
    /// Keys currently held down.
    held: HashSet<String>,
    /// Directions pressed since the last `take_pressed`.
    pending: PressedDirections,
}

impl InputManager {
    pub fn new(keybinds: &HashMap<String, Vec<String>>) -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
            held: HashSet::new(),
            pending: PressedDirections::empty(),
        };
        manager.reload_keybinds(keybinds);
        manager
    }

    /// Handles one raw event. Returns the direction if this event was a
    /// released-to-pressed edge on a bound key.
    pub fn process(&mut self, event: &RawInputEvent) -> Option<Direction> {
        match event.state {
            KeyState::Released => {
                self.held.remove(&event.key);
                None
            }
            KeyState::Pressed => {
                if event.repeat || !self.held.insert(event.key.clone()) {
                    return None;
                }
                let direction = self.bindings.get(&event.key).copied()?;
                self.pending.press(direction);
                Some(direction)
            }
        }
    }

    /// Directions pressed since the previous call; clears the pending set.
    pub fn take_pressed(&mut self) -> PressedDirections {
        std::mem::take(&mut self.pending)
    }

    pub fn binding(&self, key: &str) -> Option<Direction> {
        self.bindings.get(key).copied()
    }

    /// Replaces every binding. Unknown direction names are skipped with a warning.
    pub fn reload_keybinds(&mut self, keybinds: &HashMap<String, Vec<String>>) {
        self.bindings.clear();
        for (name, keys) in keybinds {
            let Some(direction) = Direction::from_name(name) else {
                log::warn!("INPUT: Unknown direction '{}' in keybinds, skipped", name);
                continue;
            };
            for key in keys {
                if let Some(previous) = self.bindings.insert(key.clone(), direction) {
                    log::warn!(
                        "INPUT: Key {} was bound to {}, now bound to {}",
                        key,
                        previous,
                        direction
                    );
                }
            }
        }
        log::debug!("INPUT: {} key bindings loaded", self.bindings.len());
    }
}
