//! Channel and shared counters between the game loop and the audio thread.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Load an audio file (paused at position 0).
    Load { path: PathBuf },
    /// Start or resume the loaded track.
    Play,
    /// Hold the current position.
    Pause,
    /// Stop and rewind to the start.
    Stop,
    /// Jump to `position_secs` into the track.
    Seek { position_secs: f64 },
    /// Set the master volume (0.0 to 1.0).
    SetVolume { volume: f32 },
    /// Exit the audio thread loop.
    Shutdown,
}

/// Aggregates the audio command channel and the counters the audio thread
/// publishes.
#[derive(Clone)]
pub struct AudioBus {
    /// Game loop → Audio: playback commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Playback position in samples (all channels).
    /// Written by the audio thread, read by the game loop.
    pub audio_position: Arc<AtomicU64>,

    /// Current audio sample rate.
    pub audio_sample_rate: Arc<AtomicU64>,

    /// Number of audio channels.
    pub audio_channels: Arc<AtomicU64>,

    /// True while the sink is actively playing.
    pub audio_playing: Arc<AtomicBool>,

    /// Set once the loaded track played to its end; cleared on load and seek.
    pub audio_ended: Arc<AtomicBool>,

    /// True while a decoded track sits in an output sink. Stays false in
    /// silent mode and after a failed load.
    pub audio_live: Arc<AtomicBool>,
}

impl AudioBus {
    pub fn new() -> Self {
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            audio_cmd_tx,
            audio_cmd_rx,
            audio_position: Arc::new(AtomicU64::new(0)),
            audio_sample_rate: Arc::new(AtomicU64::new(44100)),
            audio_channels: Arc::new(AtomicU64::new(2)),
            audio_playing: Arc::new(AtomicBool::new(false)),
            audio_ended: Arc::new(AtomicBool::new(false)),
            audio_live: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for AudioBus {
    fn default() -> Self {
        Self::new()
    }
}
