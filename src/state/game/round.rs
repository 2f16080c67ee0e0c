//! The per-tick gameplay transition.
//!
//! `RoundState::step` is the whole update pass as one pure function of the
//! previous state and the tick's inputs: scheduler advance (expire, then
//! admit), then judgment matching, then progress mutation.

use super::input::judge_presses;
use super::notes::NoteScheduler;
use crate::input::events::PressedDirections;
use crate::models::dirty::DirtyFlags;
use crate::models::engine::{Chart, HitWindow};
use crate::models::progress::{ProgressState, ScoreRules};
use crate::models::stats::Outcome;
use std::sync::Arc;

/// Everything the update pass consumes for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Transport position read once at the start of the tick.
    pub position: f64,
    pub pressed: PressedDirections,
}

impl TickInput {
    pub fn new(position: f64, pressed: PressedDirections) -> Self {
        Self { position, pressed }
    }

    /// A tick with nothing pressed.
    pub fn idle(position: f64) -> Self {
        Self::new(position, PressedDirections::empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    chart: Arc<Chart>,
    scheduler: NoteScheduler,
    progress: ProgressState,
    dirty: DirtyFlags,
    window: HitWindow,
    lookahead_beats: f64,
    /// Position of the latest tick.
    position: f64,
}

impl RoundState {
    pub fn new(chart: Arc<Chart>, window: HitWindow, rules: ScoreRules, lookahead_beats: f64) -> Self {
        let scheduler = NoteScheduler::new(&chart);
        Self {
            chart,
            scheduler,
            progress: ProgressState::new(rules),
            // First frame draws every layer.
            dirty: DirtyFlags::all_dirty(),
            window,
            lookahead_beats,
            position: 0.0,
        }
    }

    pub fn step(mut self, input: TickInput) -> (Self, Vec<Outcome>) {
        let outcomes = self.update(input);
        (self, outcomes)
    }

    /// In-place form of `step`.
    pub fn update(&mut self, input: TickInput) -> Vec<Outcome> {
        if self.progress.is_finished() {
            return Vec::new();
        }
        self.position = input.position;

        let mut outcomes =
            self.scheduler
                .advance(&self.chart, input.position, self.lookahead_beats, &self.window);
        outcomes.extend(judge_presses(
            &mut self.scheduler,
            input.position,
            input.pressed,
            &self.window,
        ));

        for outcome in &outcomes {
            self.progress.apply(outcome, &mut self.dirty);
        }
        outcomes
    }

    /// Resets the scheduler for a transport seek to `beats`.
    pub fn seek(&mut self, beats: f64) {
        self.scheduler.seek(&self.chart, beats, &self.window);
        self.position = beats;
    }

    pub fn finish(&mut self) {
        self.progress.finish();
    }

    pub fn chart(&self) -> &Arc<Chart> {
        &self.chart
    }

    pub fn scheduler(&self) -> &NoteScheduler {
        &self.scheduler
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtyFlags {
        &mut self.dirty
    }

    pub fn window(&self) -> &HitWindow {
        &self.window
    }

    pub fn lookahead_beats(&self) -> f64 {
        self.lookahead_beats
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dirty::Layer;
    use crate::models::engine::{Direction, Note};
    use crate::models::stats::OutcomeSource;
    use proptest::prelude::*;

    fn round(notes: Vec<Note>) -> RoundState {
        let chart = Arc::new(Chart::new(60, notes).unwrap());
        RoundState::new(chart, HitWindow::new(), ScoreRules::default(), 2.0)
    }

    fn three_lefts() -> RoundState {
        round(vec![
            Note::new(Direction::Left, 1.0),
            Note::new(Direction::Left, 2.0),
            Note::new(Direction::Left, 3.0),
        ])
    }

    fn left() -> PressedDirections {
        PressedDirections::empty().with(Direction::Left)
    }

    #[test]
    fn exact_hit_on_first_note() {
        let state = three_lefts();
        let (state, outcomes) = state.step(TickInput::new(1.0, left()));

        assert_eq!(outcomes, vec![Outcome::hit(0)]);
        assert_eq!(state.progress().score(), 5);
        assert_eq!(state.progress().streak(), 1);
        assert_eq!(state.progress().health(), 1);
    }

    #[test]
    fn unplayed_note_expires_after_grace() {
        let (mut state, _) = three_lefts().step(TickInput::new(1.0, left()));
        let mut misses = Vec::new();

        for tenth in 11..=40 {
            let position = tenth as f64 / 10.0;
            let outcomes = state.update(TickInput::idle(position));
            if position <= 3.0 {
                assert!(outcomes.is_empty(), "nothing expires at {}", position);
            }
            if position == 3.1 {
                assert_eq!(outcomes, vec![Outcome::expired(1)]);
                assert_eq!(state.progress().streak(), 0);
                assert_eq!(state.progress().health(), 0);
                assert_eq!(state.progress().score(), 5);
            }
            misses.extend(outcomes);
        }
        assert_eq!(misses, vec![Outcome::expired(1)]);
    }

    #[test]
    fn miss_leaves_score_layer_clean() {
        let mut state = three_lefts();
        for layer in Layer::ALL {
            state.dirty_mut().take(layer);
        }

        state.update(TickInput::new(0.0, PressedDirections::empty().with(Direction::Down)));
        assert!(!state.dirty().is_dirty(Layer::Score));
        assert!(state.dirty().is_dirty(Layer::Health));
        assert!(state.dirty().is_dirty(Layer::Illustration));
    }

    #[test]
    fn expired_note_cannot_be_hit_in_same_tick() {
        let mut state = round(vec![Note::new(Direction::Left, 1.0)]);
        state.update(TickInput::idle(1.0));

        let outcomes = state.update(TickInput::new(2.4, left()));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], Outcome::expired(0));
        assert_eq!(outcomes[1].source, OutcomeSource::Mistake);
        assert_eq!(state.progress().stats().expired, 1);
        assert_eq!(state.progress().stats().hits, 0);
    }

    #[test]
    fn finished_round_is_frozen() {
        let mut state = three_lefts();
        state.finish();
        let before = state.clone();

        let outcomes = state.update(TickInput::new(1.0, left()));
        assert!(outcomes.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn seek_back_allows_replaying_a_note() {
        let mut state = three_lefts();
        assert_eq!(state.update(TickInput::new(1.0, left())), vec![Outcome::hit(0)]);
        state.update(TickInput::idle(1.5));

        state.seek(0.5);
        assert!(state.scheduler().active().is_empty());
        assert_eq!(state.update(TickInput::new(1.0, left())), vec![Outcome::hit(0)]);
        assert_eq!(state.progress().score(), 10);
    }

    fn tick_script() -> impl Strategy<Value = Vec<(u32, u8)>> {
        proptest::collection::vec((0u32..3, 0u8..16), 1..200)
    }

    fn pressed_from_bits(bits: u8) -> PressedDirections {
        Direction::ALL
            .into_iter()
            .filter(|d| bits & (1 << d.lane()) != 0)
            .collect()
    }

    proptest! {
        #[test]
        fn progress_stays_bounded_and_mistakes_are_single(
            onsets in proptest::collection::vec((0u32..160, 0usize..4), 0..60),
            script in tick_script(),
        ) {
            let mut onsets = onsets;
            onsets.sort_unstable();
            let notes = onsets
                .into_iter()
                .map(|(q, lane)| Note::new(Direction::ALL[lane], q as f64 / 4.0))
                .collect();
            let mut state = round(notes);
            let mut position = 0.0;

            for (advance_quarters, bits) in script {
                position += advance_quarters as f64 / 4.0;
                let pressed = pressed_from_bits(bits);
                let outcomes = state.update(TickInput::new(position, pressed));

                let mistakes = outcomes
                    .iter()
                    .filter(|o| o.source == OutcomeSource::Mistake)
                    .count();
                let hits = outcomes.iter().filter(|o| o.is_hit()).count();
                if pressed.any() {
                    prop_assert_eq!(mistakes, usize::from(hits == 0));
                } else {
                    prop_assert_eq!(mistakes + hits, 0);
                }

                let progress = state.progress();
                prop_assert!(progress.health() <= progress.health_max());
                prop_assert!(progress.streak() <= progress.max_streak());
            }
        }
    }
}
