//! Note scheduling: admits upcoming notes into the active set and expires
//! the ones whose deadline passed unjudged.

use crate::models::engine::{Chart, HitWindow, NoteRecord};
use crate::models::stats::Outcome;
use std::collections::BTreeMap;

/// Notes currently playable, keyed by chart index.
pub type ActiveSet = BTreeMap<usize, NoteRecord>;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteScheduler {
    /// Index of the next chart note not yet admitted. Only moves forward,
    /// except through `seek`.
    next_unscheduled: usize,
    active: ActiveSet,
    /// Per chart index: judged (hit or expired) since the last re-arm.
    settled: Vec<bool>,
    /// Position of the latest `advance`.
    last_position: f64,
}

impl NoteScheduler {
    pub fn new(chart: &Chart) -> Self {
        Self {
            next_unscheduled: 0,
            active: ActiveSet::new(),
            settled: vec![false; chart.len()],
            last_position: f64::NEG_INFINITY,
        }
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    pub fn next_unscheduled(&self) -> usize {
        self.next_unscheduled
    }

    pub fn is_settled(&self, index: usize) -> bool {
        self.settled.get(index).copied().unwrap_or(false)
    }

    /// True once every note was admitted and the active set drained.
    pub fn is_exhausted(&self) -> bool {
        self.next_unscheduled >= self.settled.len() && self.active.is_empty()
    }

    /// Runs the expire pass, then the admit pass, for one position reading.
    ///
    /// Returns one expiry miss per note that passed its deadline unjudged.
    /// A note whose deadline already passed when the cursor reaches it (the
    /// position jumped over its whole window) is missed right away instead of
    /// being admitted.
    pub fn advance(
        &mut self,
        chart: &Chart,
        position: f64,
        lookahead_beats: f64,
        window: &HitWindow,
    ) -> Vec<Outcome> {
        let mut outcomes = Vec::new();

        // Expire pass
        let expired: Vec<usize> = self
            .active
            .iter()
            .filter(|(_, record)| window.is_expired(position, record.onset_beat()))
            .map(|(&index, _)| index)
            .collect();
        for index in expired {
            if let Some(record) = self.active.remove(&index) {
                self.settle(index);
                if !record.judged {
                    outcomes.push(Outcome::expired(index));
                }
            }
        }

        // Admit pass
        let notes = chart.notes();
        while let Some(note) = notes.get(self.next_unscheduled) {
            if note.onset_beat > position + lookahead_beats {
                break;
            }
            let index = self.next_unscheduled;
            self.next_unscheduled += 1;
            if self.is_settled(index) {
                continue;
            }
            if window.is_expired(position, note.onset_beat) {
                self.settle(index);
                outcomes.push(Outcome::expired(index));
            } else {
                self.active.insert(index, NoteRecord::new(*note));
            }
        }

        self.last_position = position;
        outcomes
    }

    /// Removes a note that was just hit. Returns false if it was not active.
    pub fn resolve_hit(&mut self, index: usize) -> bool {
        match self.active.remove(&index) {
            Some(_) => {
                self.settle(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn active_mut(&mut self) -> &mut ActiveSet {
        &mut self.active
    }

    fn settle(&mut self, index: usize) {
        if let Some(slot) = self.settled.get_mut(index) {
            *slot = true;
        }
    }

    /// Repositions the cursor for a transport seek to `target` beats.
    ///
    /// The active set is cleared. The cursor lands on the first chart-order
    /// note still inside its grace period at `target`, so the next `advance`
    /// rebuilds what a continuous run would hold. When moving backward, notes
    /// at or after `target` become judgeable again; every other judged note
    /// stays judged.
    pub fn seek(&mut self, chart: &Chart, target: f64, window: &HitWindow) {
        self.active.clear();
        let backward = target < self.last_position;

        let earliest_live = target - window.miss_grace_beats;
        self.next_unscheduled = chart
            .notes()
            .iter()
            .take_while(|note| note.onset_beat < earliest_live)
            .count();

        if backward {
            for (settled, note) in self.settled.iter_mut().zip(chart.notes()) {
                if note.onset_beat >= target {
                    *settled = false;
                }
            }
        }
        self.last_position = target;

        log::debug!(
            "ENGINE: Scheduler cursor reset to {} for beat {:.3}",
            self.next_unscheduled,
            target
        );
    }
}
