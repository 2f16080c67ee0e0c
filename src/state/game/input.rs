//! Judgment matching: turns the directions pressed this tick into hits, or a
//! single mistake.

use super::notes::NoteScheduler;
use crate::input::events::PressedDirections;
use crate::models::engine::HitWindow;
use crate::models::stats::Outcome;

/// Judges one tick of input against the active set.
///
/// Every active note within tolerance whose direction was pressed is hit and
/// removed. If something was pressed but nothing was hit, exactly one mistake
/// is emitted. Nothing pressed means no outcome at all.
pub fn judge_presses(
    scheduler: &mut NoteScheduler,
    position: f64,
    pressed: PressedDirections,
    window: &HitWindow,
) -> Vec<Outcome> {
    if !pressed.any() {
        return Vec::new();
    }

    let hits: Vec<usize> = scheduler
        .active_mut()
        .iter_mut()
        .filter(|(_, record)| {
            !record.judged
                && pressed.contains(record.direction())
                && window.in_tolerance(position, record.onset_beat())
        })
        .map(|(&index, record)| {
            record.judged = true;
            index
        })
        .collect();

    let mut outcomes: Vec<Outcome> = hits
        .into_iter()
        .filter(|&index| scheduler.resolve_hit(index))
        .map(Outcome::hit)
        .collect();

    if outcomes.is_empty() {
        log::debug!("ENGINE: Stray press {} at beat {:.3}", pressed, position);
        outcomes.push(Outcome::mistake());
    }
    outcomes
}
