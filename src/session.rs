use crate::exercise::ExerciseType;
use crate::util::percent;
use std::time::SystemTime;

/// Final summary of one exercise run. Immutable once produced; the
/// caller decides whether it reaches the progress log.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub exercise: ExerciseType,
    pub correct: u32,
    pub total: u32,
    pub hints_used: u32,
    pub elapsed_seconds: f64,
    pub accuracy: u32,
}

/// Accumulates correct/total/hints for a running session. Pure counters,
/// no word identity and no persistence; dropping the tally without
/// calling [`SessionTally::finish`] abandons the session with no writes.
#[derive(Debug)]
pub struct SessionTally {
    exercise: ExerciseType,
    started_at: Option<SystemTime>,
    correct: u32,
    total: u32,
    hints_used: u32,
}

impl SessionTally {
    pub fn new(exercise: ExerciseType) -> Self {
        Self {
            exercise,
            started_at: None,
            correct: 0,
            total: 0,
            hints_used: 0,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(SystemTime::now());
        self.correct = 0;
        self.total = 0;
        self.hints_used = 0;
    }

    pub fn record_outcome(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn record_hint(&mut self) {
        self.hints_used += 1;
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn finish(&self) -> SessionResult {
        let elapsed_seconds = self
            .started_at
            .and_then(|t| t.elapsed().ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        SessionResult {
            exercise: self.exercise,
            correct: self.correct,
            total: self.total,
            hints_used: self.hints_used,
            elapsed_seconds,
            accuracy: percent(self.correct, self.total),
        }
    }
}
