//! Transport clock: converts playback time into a musical position in beats.

use crate::logic::audio::AudioPlayer;
use crate::models::engine::{Chart, DEFAULT_TICKS_PER_SECOND};
use std::path::Path;
use std::time::Duration;

/// Where elapsed time comes from.
pub enum ClockSource {
    /// Nothing attached yet: position is a stable 0.
    Detached,
    /// Counts logic ticks (no audio device).
    Frames,
    /// Follows an audio player's reported elapsed time. Falls back to
    /// counting ticks while the player has no output.
    Audio(Box<dyn AudioPlayer>),
}

pub struct TransportClock {
    source: ClockSource,
    beats_per_second: f64,
    offset_beats: f64,
    /// Logic ticks counted since the start or the last seek target.
    frames: u64,
    ticks_per_second: u32,
    /// Last position handed out; `None` right after construction or a seek.
    last_position: Option<f64>,
}

impl TransportClock {
    fn with_source(chart: &Chart, source: ClockSource) -> Self {
        Self {
            source,
            beats_per_second: chart.beats_per_second(),
            offset_beats: chart.offset_beats(),
            frames: 0,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            last_position: None,
        }
    }

    /// A clock with no time source; always reports 0.
    pub fn detached(chart: &Chart) -> Self {
        Self::with_source(chart, ClockSource::Detached)
    }

    /// A clock advanced by `advance_frame`, one call per logic tick.
    pub fn frame_counter(chart: &Chart, ticks_per_second: u32) -> Self {
        Self::with_source(chart, ClockSource::Frames).with_tick_rate(ticks_per_second)
    }

    /// A clock following an audio player.
    pub fn with_audio(chart: &Chart, player: Box<dyn AudioPlayer>) -> Self {
        Self::with_source(chart, ClockSource::Audio(player))
    }

    /// Sets the logic tick rate used when counting ticks.
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second.max(1);
        self
    }

    /// Overrides the chart's calibration offset.
    pub fn with_offset(mut self, offset_beats: f64) -> Self {
        self.offset_beats = offset_beats;
        self
    }

    /// Attaches (or replaces) the audio player mid-round.
    pub fn attach(&mut self, player: Box<dyn AudioPlayer>) {
        self.source = ClockSource::Audio(player);
        self.last_position = None;
    }

    pub fn offset_beats(&self) -> f64 {
        self.offset_beats
    }

    /// Whether a time source is attached.
    pub fn is_live(&self) -> bool {
        !matches!(self.source, ClockSource::Detached)
    }

    /// Whether positions come from an audio device rather than counted ticks.
    pub fn follows_audio(&self) -> bool {
        matches!(&self.source, ClockSource::Audio(player) if player.has_output())
    }

    fn counted_seconds(&self) -> f64 {
        self.frames as f64 / self.ticks_per_second as f64
    }

    /// Elapsed playback time in seconds as reported by the source.
    pub fn elapsed_seconds(&self) -> f64 {
        match &self.source {
            ClockSource::Detached => 0.0,
            ClockSource::Audio(player) if player.has_output() => {
                player.current_elapsed().as_secs_f64()
            }
            _ => self.counted_seconds(),
        }
    }

    /// Unfiltered position derived from the source.
    pub fn raw_position(&self) -> f64 {
        if !self.is_live() {
            return 0.0;
        }
        self.elapsed_seconds() * self.beats_per_second + self.offset_beats
    }

    /// Current position in beats.
    ///
    /// A reading that moved backward without a seek is treated as clock
    /// jitter: it is logged and the last known position is returned instead.
    pub fn position_in_beats(&mut self) -> f64 {
        let raw = self.raw_position();
        match self.last_position {
            Some(last) if raw < last => {
                log::warn!(
                    "CLOCK: Transport moved backward without a seek ({:.4} -> {:.4} beats), holding",
                    last,
                    raw
                );
                last
            }
            _ => {
                self.last_position = Some(raw);
                raw
            }
        }
    }

    /// Advances the tick count by one. While an audio player has output the
    /// count is resynced to the device instead, so losing the output later
    /// continues from where the track was.
    pub fn advance_frame(&mut self) {
        match &self.source {
            ClockSource::Detached => {}
            ClockSource::Audio(player) if player.has_output() => {
                let seconds = player.current_elapsed().as_secs_f64();
                self.frames = (seconds * self.ticks_per_second as f64).round() as u64;
            }
            _ => self.frames += 1,
        }
    }

    /// Seeks the source so that the next reading is `beats`.
    ///
    /// Callers must also reset the scheduler cursor (see `GameEngine::set_position`).
    pub fn set_position(&mut self, beats: f64) {
        let seconds = ((beats - self.offset_beats) / self.beats_per_second).max(0.0);
        if let ClockSource::Detached = self.source {
            return;
        }
        self.frames = (seconds * self.ticks_per_second as f64).round() as u64;
        if let ClockSource::Audio(player) = &mut self.source {
            player.seek(Duration::from_secs_f64(seconds));
        }
        self.last_position = None;
        log::info!("CLOCK: Seeked to beat {:.3} ({:.3}s)", beats, seconds);
    }

    /// Starts playback of `track` on an attached audio player.
    pub fn start(&mut self, track: &Path) {
        if let ClockSource::Audio(player) = &mut self.source {
            player.play(track);
        }
    }

    pub fn pause(&mut self) {
        if let ClockSource::Audio(player) = &mut self.source {
            player.pause();
        }
    }

    pub fn is_playing(&self) -> bool {
        match &self.source {
            ClockSource::Detached => false,
            ClockSource::Audio(player) if player.has_output() => player.is_playing(),
            _ => true,
        }
    }

    /// Whether the source has played past `end_seconds`, or its track ran out.
    pub fn playback_ended(&self, end_seconds: f64) -> bool {
        match &self.source {
            ClockSource::Detached => false,
            ClockSource::Audio(player) if player.has_output() && player.has_ended() => true,
            _ => self.elapsed_seconds() >= end_seconds,
        }
    }
}
