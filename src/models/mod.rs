pub mod dirty;
pub mod engine;
pub mod error;
pub mod progress;
pub mod settings;
pub mod stats;
