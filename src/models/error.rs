//! Error types for chart loading, configuration and frame output.

use std::path::PathBuf;
use thiserror::Error;

/// A chart that failed to load. Charts are never partially loaded.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to read chart file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chart: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid field `bpm`: {bpm} (must be a positive integer)")]
    InvalidBpm { bpm: i64 },

    #[error("Invalid field `notes[{index}].onset`: {onset} (must not be negative)")]
    NegativeOnset { index: usize, onset: f64 },

    #[error("Invalid field `notes[{index}].onset`: not a finite number")]
    NonFiniteOnset { index: usize },

    #[error("Invalid field `duration`: {duration} (must be a non-negative number of seconds)")]
    InvalidDuration { duration: f64 },

    #[error("Invalid field `offset`: not a finite number")]
    NonFiniteOffset,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Screen {width}x{height} is too small for the play layout")]
    ScreenTooSmall { width: u32, height: u32 },

    #[error("Failed to write frame to {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
