//! Core gameplay engine for the rhythm round.
//!
//! The `GameEngine` ties the transport clock to the round state:
//! - reads the position once per tick
//! - queries the input source at that position
//! - runs the update pass (scheduler, matcher, progress)
//! - finishes the round when the transport reports playback ended

mod input;
mod notes;
mod round;
mod snapshot;

pub use input::judge_presses;
pub use notes::{ActiveSet, NoteScheduler};
pub use round::{RoundState, TickInput};
pub use snapshot::{GameplaySnapshot, NoteView};

use crate::input::InputSource;
use crate::input::events::PressedDirections;
use crate::logic::clock::TransportClock;
use crate::models::dirty::DirtyFlags;
use crate::models::engine::Chart;
use crate::models::progress::ProgressState;
use crate::models::settings::GameSettings;
use crate::models::stats::Outcome;
use std::path::Path;
use std::sync::Arc;

/// Main gameplay engine handling note timing, scoring and transport sync.
pub struct GameEngine {
    clock: TransportClock,
    round: RoundState,
    /// Playback time (seconds) after which the round is over.
    end_seconds: f64,
    /// Directions pressed during the latest tick (receptor feedback).
    last_pressed: PressedDirections,
}

impl GameEngine {
    /// Creates an engine over `clock`, applying the judge, scoring and
    /// playback settings.
    pub fn new(chart: Arc<Chart>, settings: &GameSettings, clock: TransportClock) -> Self {
        let clock = clock.with_tick_rate(settings.playback.ticks_per_second);
        let clock = match settings.playback.calibration_offset_beats {
            Some(offset) => clock.with_offset(offset),
            None => clock,
        };
        let window = settings.hit_window();
        let end_seconds = chart.end_seconds(window.miss_grace_beats);
        let round = RoundState::new(
            chart,
            window,
            settings.score_rules(),
            settings.lookahead_beats(),
        );

        log::info!(
            "ENGINE: Round ready ({} notes, lookahead {:.2} beats, ends at {:.2}s)",
            round.chart().len(),
            round.lookahead_beats(),
            end_seconds
        );

        Self {
            clock,
            round,
            end_seconds,
            last_pressed: PressedDirections::empty(),
        }
    }

    /// Creates an engine whose transport counts logic ticks (no audio).
    pub fn with_frame_clock(chart: Arc<Chart>, settings: &GameSettings) -> Self {
        let clock = TransportClock::frame_counter(&chart, settings.playback.ticks_per_second);
        Self::new(chart, settings, clock)
    }

    /// Starts audio playback of `track` when an audio player is attached.
    pub fn start(&mut self, track: &Path) {
        log::info!("ENGINE: Starting playback of {:?}", track);
        self.clock.start(track);
    }

    /// Runs one tick, polling `input` at the current position.
    pub fn tick(&mut self, input: &mut dyn InputSource) -> Vec<Outcome> {
        let position = self.clock.position_in_beats();
        let pressed = input.poll(position);
        self.tick_at(position, pressed)
    }

    /// Runs one tick with an explicit pressed set.
    pub fn tick_with(&mut self, pressed: PressedDirections) -> Vec<Outcome> {
        let position = self.clock.position_in_beats();
        self.tick_at(position, pressed)
    }

    fn tick_at(&mut self, position: f64, pressed: PressedDirections) -> Vec<Outcome> {
        self.last_pressed = pressed;
        let outcomes = self.round.update(TickInput::new(position, pressed));

        for outcome in &outcomes {
            log::debug!("ENGINE: {:?} at beat {:.3}", outcome, position);
        }

        if !self.round.progress().is_finished() && self.clock.playback_ended(self.end_seconds) {
            self.round.finish();
        }

        self.clock.advance_frame();
        outcomes
    }

    /// Seeks the transport and resets the scheduler cursor to match.
    pub fn set_position(&mut self, beats: f64) {
        self.clock.set_position(beats);
        self.round.seek(beats);
    }

    /// Seeks the transport, then tells `input` about the new position.
    pub fn seek_with(&mut self, beats: f64, input: &mut dyn InputSource) {
        self.set_position(beats);
        input.seek(beats);
    }

    pub fn is_finished(&self) -> bool {
        self.round.progress().is_finished()
    }

    pub fn progress(&self) -> &ProgressState {
        self.round.progress()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn chart(&self) -> &Arc<Chart> {
        self.round.chart()
    }

    pub fn clock(&self) -> &TransportClock {
        &self.clock
    }

    /// Flags read and cleared by the render cache after each update pass.
    pub fn dirty_flags_mut(&mut self) -> &mut DirtyFlags {
        self.round.dirty_mut()
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Autoplay, NoInput};
    use crate::logic::audio::AudioManager;
    use crate::system::bus::AudioBus;
    use crate::models::engine::{ChartData, Direction, Note};

    fn chart() -> Arc<Chart> {
        let data = ChartData {
            title: "Test".to_string(),
            bpm: 120,
            offset: Some(0.0),
            notes: vec![
                Note::new(Direction::Left, 1.0),
                Note::new(Direction::Down, 2.0),
                Note::new(Direction::Up, 3.0),
                Note::new(Direction::Right, 4.0),
            ],
            ..ChartData::default()
        };
        Arc::new(Chart::from_data(data).unwrap())
    }

    fn run(engine: &mut GameEngine, input: &mut dyn InputSource) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for _ in 0..10_000 {
            if engine.is_finished() {
                break;
            }
            outcomes.extend(engine.tick(input));
        }
        outcomes
    }

    #[test]
    fn autoplay_clears_every_note() {
        let chart = chart();
        let mut engine = GameEngine::with_frame_clock(chart.clone(), &GameSettings::default());
        let mut auto = Autoplay::new(chart);

        let outcomes = run(&mut engine, &mut auto);
        assert!(engine.is_finished());
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(Outcome::is_hit));
        assert_eq!(engine.progress().score(), 20);
        assert_eq!(engine.progress().max_streak(), 4);
        assert_eq!(engine.progress().stats().calculate_accuracy(), 100.0);
    }

    #[test]
    fn idle_round_expires_every_note() {
        let mut engine = GameEngine::with_frame_clock(chart(), &GameSettings::default());
        let outcomes = run(&mut engine, &mut NoInput);

        assert!(engine.is_finished());
        assert_eq!(outcomes, (0..4).map(Outcome::expired).collect::<Vec<_>>());
        assert_eq!(engine.progress().health(), 0);
        assert_eq!(engine.progress().score(), 0);
    }

    #[test]
    fn seek_back_replays_notes() {
        let chart = chart();
        let mut engine = GameEngine::with_frame_clock(chart.clone(), &GameSettings::default());
        let mut auto = Autoplay::new(chart);
        run(&mut engine, &mut auto);
        assert!(engine.is_finished());

        // Finished progress stays read-only even after a seek.
        engine.seek_with(0.0, &mut auto);
        assert!(engine.tick(&mut auto).is_empty());
        assert_eq!(engine.progress().score(), 20);
    }

    #[test]
    fn seek_mid_round_resets_cursor() {
        let chart = chart();
        let mut engine = GameEngine::with_frame_clock(chart.clone(), &GameSettings::default());
        let mut auto = Autoplay::new(chart);

        engine.seek_with(2.5, &mut auto);
        let outcomes = run(&mut engine, &mut auto);
        // Notes 0 and 1 are out of reach after the seek; note 1 is still
        // inside its grace period and expires.
        assert!(outcomes.contains(&Outcome::expired(1)));
        assert!(outcomes.contains(&Outcome::hit(2)));
        assert!(outcomes.contains(&Outcome::hit(3)));
        assert!(!outcomes.iter().any(|o| o.note == Some(0)));
    }

    #[test]
    fn round_without_audio_output_still_finishes() {
        let bus = AudioBus::new();
        let chart = chart();
        let clock = TransportClock::with_audio(&chart, Box::new(AudioManager::new(&bus)));
        let mut engine = GameEngine::new(chart, &GameSettings::default(), clock);
        engine.start(Path::new("missing.ogg"));

        let outcomes = run(&mut engine, &mut NoInput);
        assert!(engine.is_finished());
        assert_eq!(outcomes, (0..4).map(Outcome::expired).collect::<Vec<_>>());
    }

    #[test]
    fn calibration_setting_overrides_chart_offset() {
        let mut settings = GameSettings::default();
        settings.playback.calibration_offset_beats = Some(0.5);
        let mut engine = GameEngine::with_frame_clock(chart(), &settings);
        engine.tick_with(PressedDirections::empty());
        assert_eq!(engine.round().position(), 0.5);
        assert_eq!(engine.clock().offset_beats(), 0.5);
    }
}
