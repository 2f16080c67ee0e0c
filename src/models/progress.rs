//! Score, streak and thermometer state for one round.

use crate::models::dirty::{DirtyFlags, Layer};
use crate::models::engine::constants::{HEALTH_MAX, HIT_SCORE, MISS_PENALTY};
use crate::models::stats::{HitStats, Judgement, Outcome};

/// Tunable scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    pub hit_score: u32,
    pub health_max: u32,
    pub miss_penalty: u32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            hit_score: HIT_SCORE,
            health_max: HEALTH_MAX,
            miss_penalty: MISS_PENALTY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    /// Playback ended; progress no longer changes.
    Finished,
}

/// Which illustration variant the status column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    /// Last judgement was a hit (or nothing judged yet).
    Light,
    /// Last judgement was a miss.
    Dark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    score: u32,
    streak: u32,
    max_streak: u32,
    /// Always within `[0, rules.health_max]`.
    health: u32,
    mood: Mood,
    stats: HitStats,
    phase: RoundPhase,
    rules: ScoreRules,
}

impl ProgressState {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            score: 0,
            streak: 0,
            max_streak: 0,
            health: 0,
            mood: Mood::Light,
            stats: HitStats::new(),
            phase: RoundPhase::Playing,
            rules,
        }
    }

    /// Applies one outcome and marks the layers whose pixels changed.
    pub fn apply(&mut self, outcome: &Outcome, dirty: &mut DirtyFlags) {
        if self.is_finished() {
            log::debug!("ENGINE: Ignoring {:?} after the round finished", outcome);
            return;
        }
        self.stats.record(outcome);
        match outcome.judgement {
            Judgement::Hit => self.apply_hit(dirty),
            Judgement::Miss => self.apply_miss(dirty),
        }
    }

    pub fn apply_hit(&mut self, dirty: &mut DirtyFlags) {
        if self.is_finished() {
            return;
        }
        self.score = self.score.saturating_add(self.rules.hit_score);
        self.streak = self.streak.saturating_add(1);
        self.max_streak = self.max_streak.max(self.streak);
        self.health = (self.health + 1).min(self.rules.health_max);
        self.mood = Mood::Light;

        dirty.mark(Layer::Score);
        dirty.mark(Layer::Health);
        dirty.mark(Layer::Illustration);
    }

    pub fn apply_miss(&mut self, dirty: &mut DirtyFlags) {
        if self.is_finished() {
            return;
        }
        self.streak = 0;
        self.health = self.health.saturating_sub(self.rules.miss_penalty);
        self.mood = Mood::Dark;

        // Score is untouched, so its layer stays clean.
        dirty.mark(Layer::Health);
        dirty.mark(Layer::Illustration);
    }

    /// Freezes the state once the transport reports playback ended.
    pub fn finish(&mut self) {
        if self.phase == RoundPhase::Playing {
            log::info!(
                "ENGINE: Round finished (score {}, streak {}, max streak {}, health {}/{})",
                self.score,
                self.streak,
                self.max_streak,
                self.health,
                self.rules.health_max
            );
        }
        self.phase = RoundPhase::Finished;
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RoundPhase::Finished
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn health_max(&self) -> u32 {
        self.rules.health_max
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn stats(&self) -> &HitStats {
        &self.stats
    }

    pub fn rules(&self) -> ScoreRules {
        self.rules
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new(ScoreRules::default())
    }
}
