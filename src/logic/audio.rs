//! Audio playback contract consumed by the transport clock, and its
//! implementations.
//!
//! `AudioManager` drives the dedicated audio thread without blocking the game
//! loop. `ManualPlayer` is an in-memory player whose clock is moved by hand,
//! used for deterministic simulation and tests.

use crate::system::bus::{AudioBus, AudioCommand};
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Playback source the transport clock reads from.
pub trait AudioPlayer {
    /// Elapsed playback time of the current track.
    fn current_elapsed(&self) -> Duration;
    fn is_playing(&self) -> bool;
    fn seek(&mut self, position: Duration);
    fn play(&mut self, track: &Path);
    fn pause(&mut self);

    /// Whether the track played through to its end.
    fn has_ended(&self) -> bool {
        false
    }

    /// Whether a track is actually loaded on an output device. While false,
    /// `current_elapsed` carries no information.
    fn has_output(&self) -> bool {
        true
    }
}

/// Wrapper for sending commands to the audio thread.
pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
    playing: Arc<AtomicBool>,
    ended: Arc<AtomicBool>,
    live: Arc<AtomicBool>,
}

impl AudioManager {
    /// Creates a new audio manager connected to the bus.
    pub fn new(bus: &AudioBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            position: bus.audio_position.clone(),
            sample_rate: bus.audio_sample_rate.clone(),
            channels: bus.audio_channels.clone(),
            playing: bus.audio_playing.clone(),
            ended: bus.audio_ended.clone(),
            live: bus.audio_live.clone(),
        }
    }

    fn send(&self, cmd: AudioCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::warn!("AUDIO: Audio thread is gone, command dropped");
        }
    }

    /// Stops playback and resets position.
    pub fn stop(&mut self) {
        self.send(AudioCommand::Stop);
    }

    /// Sets the master volume (0.0 to 1.0).
    pub fn set_volume(&mut self, volume: f32) {
        self.send(AudioCommand::SetVolume {
            volume: volume.clamp(0.0, 1.0),
        });
    }

    /// Asks the audio thread to exit.
    pub fn shutdown(&self) {
        self.send(AudioCommand::Shutdown);
    }

    fn samples_per_second(&self) -> f64 {
        let sample_rate = self.sample_rate.load(Ordering::Relaxed).max(1) as f64;
        let channels = self.channels.load(Ordering::Relaxed).max(1) as f64;
        sample_rate * channels
    }
}

impl AudioPlayer for AudioManager {
    /// Derived from the sample count shared atomically with the audio thread.
    fn current_elapsed(&self) -> Duration {
        let samples = self.position.load(Ordering::Relaxed) as f64;
        Duration::from_secs_f64(samples / self.samples_per_second())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    /// Non-blocking; the shared position jumps to the target immediately so
    /// readers never see the pre-seek position again.
    fn seek(&mut self, position: Duration) {
        let samples = (position.as_secs_f64() * self.samples_per_second()) as u64;
        self.position.store(samples, Ordering::Relaxed);
        self.send(AudioCommand::Seek {
            position_secs: position.as_secs_f64(),
        });
    }

    fn play(&mut self, track: &Path) {
        self.send(AudioCommand::Load {
            path: track.to_path_buf(),
        });
        self.send(AudioCommand::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCommand::Pause);
    }

    fn has_ended(&self) -> bool {
        self.ended.load(Ordering::Relaxed)
    }

    fn has_output(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }
}

/// Player whose elapsed time is advanced explicitly by the caller.
#[derive(Debug, Clone, Default)]
pub struct ManualPlayer {
    elapsed: Duration,
    playing: bool,
    seeks: u32,
}

impl ManualPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward while playing.
    pub fn advance(&mut self, dt: Duration) {
        if self.playing {
            self.elapsed += dt;
        }
    }

    /// Forces the reported time, bypassing `seek` (simulates clock jitter).
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Number of seeks received.
    pub fn seek_count(&self) -> u32 {
        self.seeks
    }
}

impl AudioPlayer for ManualPlayer {
    fn current_elapsed(&self) -> Duration {
        self.elapsed
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek(&mut self, position: Duration) {
        self.elapsed = position;
        self.seeks += 1;
    }

    fn play(&mut self, _track: &Path) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_reads_position_from_bus() {
        let bus = AudioBus::new();
        let manager = AudioManager::new(&bus);
        bus.audio_sample_rate.store(1000, Ordering::Relaxed);
        bus.audio_channels.store(2, Ordering::Relaxed);
        bus.audio_position.store(3000, Ordering::Relaxed);

        assert_eq!(manager.current_elapsed(), Duration::from_millis(1500));
        assert!(!manager.is_playing());
    }

    #[test]
    fn manager_seek_publishes_target_and_sends_command() {
        let bus = AudioBus::new();
        let mut manager = AudioManager::new(&bus);
        bus.audio_sample_rate.store(1000, Ordering::Relaxed);
        bus.audio_channels.store(1, Ordering::Relaxed);
        bus.audio_position.store(9000, Ordering::Relaxed);

        manager.seek(Duration::from_secs(2));

        assert_eq!(manager.current_elapsed(), Duration::from_secs(2));
        match bus.audio_cmd_rx.try_recv() {
            Ok(AudioCommand::Seek { position_secs }) => assert_eq!(position_secs, 2.0),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn manager_play_loads_then_plays() {
        let bus = AudioBus::new();
        let mut manager = AudioManager::new(&bus);
        manager.play(Path::new("song.ogg"));

        assert!(matches!(
            bus.audio_cmd_rx.try_recv(),
            Ok(AudioCommand::Load { .. })
        ));
        assert!(matches!(bus.audio_cmd_rx.try_recv(), Ok(AudioCommand::Play)));
    }

    #[test]
    fn manager_reports_end_of_track() {
        let bus = AudioBus::new();
        let manager = AudioManager::new(&bus);
        assert!(!manager.has_ended());

        bus.audio_ended.store(true, Ordering::Relaxed);
        assert!(manager.has_ended());
    }

    #[test]
    fn manager_has_no_output_until_a_track_loads() {
        let bus = AudioBus::new();
        let manager = AudioManager::new(&bus);
        assert!(!manager.has_output());

        bus.audio_live.store(true, Ordering::Relaxed);
        assert!(manager.has_output());
    }

    #[test]
    fn manual_player_only_advances_while_playing() {
        let mut player = ManualPlayer::new();
        player.advance(Duration::from_secs(1));
        assert_eq!(player.current_elapsed(), Duration::ZERO);

        player.play(Path::new(""));
        player.advance(Duration::from_secs(1));
        player.pause();
        player.advance(Duration::from_secs(1));
        assert_eq!(player.current_elapsed(), Duration::from_secs(1));
    }
}
