//! Tolerance and grace windows, measured in beats.

use super::constants::{DEFAULT_HIT_TOLERANCE_BEATS, DEFAULT_MISS_GRACE_BEATS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    /// A press counts when `|position - onset| <= tolerance_beats`.
    pub tolerance_beats: f64,
    /// An unjudged note expires once `position > onset + miss_grace_beats`.
    pub miss_grace_beats: f64,
}

impl HitWindow {
    /// Default window: half a beat either side, one beat of grace.
    pub fn new() -> Self {
        Self {
            tolerance_beats: DEFAULT_HIT_TOLERANCE_BEATS,
            miss_grace_beats: DEFAULT_MISS_GRACE_BEATS,
        }
    }

    /// Utility constructor for fully custom values.
    pub fn from_custom(tolerance_beats: f64, miss_grace_beats: f64) -> Self {
        if tolerance_beats > miss_grace_beats {
            log::warn!(
                "ENGINE: Hit tolerance {:.2} exceeds miss grace {:.2}; late presses will be cut short",
                tolerance_beats,
                miss_grace_beats
            );
        }
        Self {
            tolerance_beats,
            miss_grace_beats,
        }
    }

    /// Whether a press at `position` may hit a note at `onset`.
    pub fn in_tolerance(&self, position: f64, onset: f64) -> bool {
        (position - onset).abs() <= self.tolerance_beats
    }

    /// Whether a note at `onset` has passed its deadline.
    pub fn is_expired(&self, position: f64, onset: f64) -> bool {
        position > onset + self.miss_grace_beats
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}
