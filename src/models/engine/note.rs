//! Note types: the four arrow directions and the runtime record wrapping a chart note.

use super::constants::NUM_DIRECTIONS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrow lane a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl Direction {
    /// All directions in lane order (left to right on screen).
    pub const ALL: [Direction; NUM_DIRECTIONS] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// Lane index (0-3).
    pub fn lane(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Up => 2,
            Direction::Right => 3,
        }
    }

    /// Parses a lowercase direction name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Direction::Left),
            "down" => Some(Direction::Down),
            "up" => Some(Direction::Up),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single note of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Which arrow must be pressed.
    pub direction: Direction,
    /// Beat at which the note should be hit.
    #[serde(rename = "onset")]
    pub onset_beat: f64,
}

impl Note {
    pub fn new(direction: Direction, onset_beat: f64) -> Self {
        Self {
            direction,
            onset_beat,
        }
    }
}

/// Runtime state of a note while it sits in the active set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteRecord {
    pub note: Note,
    /// Becomes true once the note is hit or expires.
    pub judged: bool,
}

impl NoteRecord {
    pub fn new(note: Note) -> Self {
        Self { note, judged: false }
    }

    pub fn direction(&self) -> Direction {
        self.note.direction
    }

    pub fn onset_beat(&self) -> f64 {
        self.note.onset_beat
    }
}
