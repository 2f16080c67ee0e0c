//! Default gameplay constants.

/// Number of lanes (one per arrow direction).
pub const NUM_DIRECTIONS: usize = 4;

/// Points awarded per hit.
pub const HIT_SCORE: u32 = 5;

/// Upper bound of the thermometer gauge.
pub const HEALTH_MAX: u32 = 25;

/// Thermometer points lost per miss.
pub const MISS_PENALTY: u32 = 2;

/// Maximum distance (in beats) between the transport and a note onset for a press to count.
pub const DEFAULT_HIT_TOLERANCE_BEATS: f64 = 0.5;

/// Beats after the onset before an unjudged note expires as a miss.
pub const DEFAULT_MISS_GRACE_BEATS: f64 = 1.0;

/// Calibration offset compensating for audio pipeline latency.
/// Positive values make notes arrive later (you hit them earlier).
pub const DEFAULT_NOTE_OFFSET_BEATS: f64 = 0.23;

/// Default scroll speed. Lookahead is `LOOKAHEAD_SCALE / speed` beats.
pub const DEFAULT_SCROLL_SPEED: f64 = 2.0;
pub const LOOKAHEAD_SCALE: f64 = 4.0;

/// Logic ticks per second for the frame-counter transport.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Extra beats after the last note before a chart without a duration ends.
pub const END_PADDING_BEATS: f64 = 2.0;
