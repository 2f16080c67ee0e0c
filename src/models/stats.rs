//! Judgement outcomes and accumulated hit statistics.

/// Result of judging a note (or a stray press).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Judgement {
    Hit,
    Miss,
}

/// Why a miss was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// A press matched a note in tolerance.
    Press,
    /// A note passed its deadline unjudged.
    Expired,
    /// Directions were pressed but nothing in tolerance matched.
    Mistake,
}

/// One judgement emitted during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub judgement: Judgement,
    /// Chart index of the judged note. `None` for a mistake.
    pub note: Option<usize>,
    pub source: OutcomeSource,
}

impl Outcome {
    pub fn hit(note: usize) -> Self {
        Self {
            judgement: Judgement::Hit,
            note: Some(note),
            source: OutcomeSource::Press,
        }
    }

    pub fn expired(note: usize) -> Self {
        Self {
            judgement: Judgement::Miss,
            note: Some(note),
            source: OutcomeSource::Expired,
        }
    }

    pub fn mistake() -> Self {
        Self {
            judgement: Judgement::Miss,
            note: None,
            source: OutcomeSource::Mistake,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.judgement == Judgement::Hit
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HitStats {
    pub hits: u32,
    /// Notes that expired unjudged.
    pub expired: u32,
    /// Ticks with presses that matched nothing.
    pub mistakes: u32,
}

impl HitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match outcome.source {
            OutcomeSource::Press => self.hits += 1,
            OutcomeSource::Expired => self.expired += 1,
            OutcomeSource::Mistake => self.mistakes += 1,
        }
    }

    /// Notes that have been judged either way.
    pub fn notes_passed(&self) -> u32 {
        self.hits + self.expired
    }

    /// Hit percentage over judged notes (0-100). Mistakes do not count.
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.notes_passed() as f64;
        if total == 0.0 {
            return 0.0;
        }
        (self.hits as f64 / total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_ignores_mistakes() {
        let mut stats = HitStats::new();
        stats.record(&Outcome::hit(0));
        stats.record(&Outcome::hit(1));
        stats.record(&Outcome::hit(2));
        stats.record(&Outcome::expired(3));
        stats.record(&Outcome::mistake());
        assert_eq!(stats.notes_passed(), 4);
        assert_eq!(stats.mistakes, 1);
        assert_eq!(stats.calculate_accuracy(), 75.0);
    }

    #[test]
    fn empty_accuracy_is_zero() {
        assert_eq!(HitStats::new().calculate_accuracy(), 0.0);
    }
}
