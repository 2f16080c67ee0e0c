//! Read-only view of a tick, handed to the renderer.

use super::GameEngine;
use super::round::RoundState;
use crate::input::events::PressedDirections;
use crate::models::dirty::{Layer, LayerStatus};
use crate::models::engine::Direction;
use crate::models::progress::Mood;

/// An active note as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteView {
    /// Chart index.
    pub index: usize,
    pub direction: Direction,
    pub onset_beat: f64,
    /// 0 when the note enters the lookahead, `hit_line` at its onset,
    /// 1 at its expiry deadline.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameplaySnapshot {
    pub position_beats: f64,
    pub active_notes: Vec<NoteView>,
    /// Progress value at which a note is exactly on time.
    pub hit_line: f64,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub health: u32,
    pub health_max: u32,
    pub mood: Mood,
    pub accuracy: f64,
    pub layers: [(Layer, LayerStatus); 3],
    /// Directions pressed during the tick.
    pub pressed: PressedDirections,
    pub finished: bool,
}

impl GameplaySnapshot {
    /// Builds the view of `round` after its latest tick.
    pub fn capture(round: &RoundState, pressed: PressedDirections) -> Self {
        let position = round.position();
        let lookahead = round.lookahead_beats();
        let span = lookahead + round.window().miss_grace_beats;

        let active_notes = round
            .scheduler()
            .active()
            .iter()
            .map(|(&index, record)| NoteView {
                index,
                direction: record.direction(),
                onset_beat: record.onset_beat(),
                progress: note_progress(position, record.onset_beat(), lookahead, span),
            })
            .collect();

        let progress = round.progress();
        let dirty = round.dirty();

        Self {
            position_beats: position,
            active_notes,
            hit_line: if span > 0.0 { lookahead / span } else { 1.0 },
            score: progress.score(),
            streak: progress.streak(),
            max_streak: progress.max_streak(),
            health: progress.health(),
            health_max: progress.health_max(),
            mood: progress.mood(),
            accuracy: progress.stats().calculate_accuracy(),
            layers: Layer::ALL.map(|layer| (layer, dirty.status(layer))),
            pressed,
            finished: progress.is_finished(),
        }
    }

    pub fn layer_status(&self, layer: Layer) -> LayerStatus {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map_or(LayerStatus::Clean, |(_, status)| *status)
    }

    /// Drummer animation frame (0 or 1), alternating every beat.
    pub fn drummer_frame(&self) -> usize {
        (self.position_beats.floor() as i64).rem_euclid(2) as usize
    }
}

/// Normalized travel of a note through its window, clamped to `[0, 1]`.
fn note_progress(position: f64, onset: f64, lookahead: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    ((position - (onset - lookahead)) / span).clamp(0.0, 1.0)
}

impl GameEngine {
    /// Creates a snapshot of the current game state for rendering.
    pub fn snapshot(&self) -> GameplaySnapshot {
        GameplaySnapshot::capture(&self.round, self.last_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::{Chart, HitWindow, Note};
    use crate::models::progress::ScoreRules;
    use crate::state::game::round::TickInput;
    use std::sync::Arc;

    fn round() -> RoundState {
        let chart = Chart::new(
            60,
            vec![Note::new(Direction::Down, 2.0), Note::new(Direction::Up, 4.0)],
        )
        .unwrap();
        RoundState::new(Arc::new(chart), HitWindow::new(), ScoreRules::default(), 2.0)
    }

    #[test]
    fn progress_places_notes_on_hit_line_at_onset() {
        let mut state = round();
        state.update(TickInput::idle(2.0));
        let snapshot = GameplaySnapshot::capture(&state, PressedDirections::empty());

        assert!((snapshot.hit_line - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(snapshot.active_notes.len(), 2);
        let down = snapshot.active_notes[0];
        assert_eq!(down.direction, Direction::Down);
        assert!((down.progress - snapshot.hit_line).abs() < 1e-12);
        // Onset 4.0 just entered the lookahead.
        assert_eq!(snapshot.active_notes[1].progress, 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(note_progress(10.0, 2.0, 2.0, 3.0), 1.0);
        assert_eq!(note_progress(-5.0, 2.0, 2.0, 3.0), 0.0);
        assert_eq!(note_progress(1.0, 2.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn exposes_layer_status_and_drummer_frame() {
        let mut state = round();
        state.dirty_mut().take(Layer::Score);
        state.update(TickInput::idle(3.5));
        let snapshot = GameplaySnapshot::capture(&state, PressedDirections::empty());

        assert_eq!(snapshot.layer_status(Layer::Score), LayerStatus::Clean);
        assert_eq!(snapshot.layer_status(Layer::Health), LayerStatus::Dirty);
        assert_eq!(snapshot.drummer_frame(), 1);
        assert!(!snapshot.finished);
    }
}
