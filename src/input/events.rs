use crate::models::engine::Direction;
use std::fmt;

/// Key state carried by a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A keyboard event as delivered by the host window or terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputEvent {
    /// Physical key label, e.g. `ArrowLeft` or `KeyA`.
    pub key: String,
    pub state: KeyState,
    /// Set by the OS for auto-repeated presses.
    pub repeat: bool,
}

impl RawInputEvent {
    pub fn pressed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Pressed,
            repeat: false,
        }
    }

    pub fn released(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Released,
            repeat: false,
        }
    }

    pub fn repeated(key: impl Into<String>) -> Self {
        Self {
            repeat: true,
            ..Self::pressed(key)
        }
    }
}

/// Directions newly pressed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PressedDirections {
    bits: u8,
}

impl PressedDirections {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        self.bits |= 1 << direction.lane();
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.press(direction);
        self
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.bits & (1 << direction.lane()) != 0
    }

    pub fn any(&self) -> bool {
        self.bits != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Pressed directions in lane order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Direction> for PressedDirections {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        let mut pressed = Self::empty();
        for direction in iter {
            pressed.press(direction);
        }
        pressed
    }
}

impl fmt::Display for PressedDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Direction::name).collect();
        write!(f, "{{{}}}", names.join(","))
    }
}
