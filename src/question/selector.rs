use super::core::QuestionPool;
use crate::error::DrillError;
use crate::tracking::ProblemEntry;
use rand::{Rng, RngCore};
use std::collections::{HashMap, HashSet};

/// Probability of boosting a problem word on a default turn.
const PROBLEM_BOOST: f64 = 0.3;

/// Per-session selection policy. Each turn is decided by the first
/// matching rule, in order: first-turn custom forcing, bounded custom
/// injection, problem-word boosting, then a default draw that excludes
/// mastered words and already-used indices and resets itself rather
/// than starve.
///
/// Randomness comes through an injected source so the policy can be
/// tested deterministically with a seeded generator.
pub struct QuestionSelector {
    rng: Box<dyn RngCore>,
    custom_frequency: f64,
    used_indices: HashSet<usize>,
    just_showed_custom: bool,
    turn: u32,
}

impl QuestionSelector {
    pub fn new(custom_frequency: f64) -> Self {
        Self::with_rng(custom_frequency, Box::new(rand::thread_rng()))
    }

    pub fn with_rng(custom_frequency: f64, rng: Box<dyn RngCore>) -> Self {
        Self {
            rng,
            custom_frequency,
            used_indices: HashSet::new(),
            just_showed_custom: false,
            turn: 0,
        }
    }

    /// Pick the index of the next question to show. Never fails for a
    /// non-empty pool; an empty pool is a configuration error.
    pub fn next(
        &mut self,
        pool: &QuestionPool,
        mastered: &HashSet<String>,
        problems: &HashMap<String, ProblemEntry>,
    ) -> Result<usize, DrillError> {
        if pool.is_empty() {
            return Err(DrillError::EmptyPool(pool.exercise));
        }
        self.turn += 1;

        let custom = pool.custom_indices();

        // Rule 1: the learner's own content always opens the session.
        if self.turn == 1 && !custom.is_empty() {
            self.just_showed_custom = true;
            return Ok(self.pick(&custom));
        }

        // Rule 2: bounded custom injection, never two injections in a row.
        if !self.just_showed_custom && self.rng.gen::<f64>() < self.custom_frequency {
            let fresh: Vec<usize> = custom
                .iter()
                .copied()
                .filter(|&i| !mastered.contains(&pool.questions[i].word()))
                .collect();
            if !fresh.is_empty() {
                self.just_showed_custom = true;
                return Ok(self.pick(&fresh));
            }
        }
        self.just_showed_custom = false;

        // Rule 3: remediation loop for problem words present in the pool.
        if !problems.is_empty() && self.rng.gen_bool(PROBLEM_BOOST) {
            let mut words: Vec<&String> = problems
                .keys()
                .filter(|w| pool.find_by_word(w).is_some())
                .collect();
            words.sort();
            if !words.is_empty() {
                let word = words[self.rng.gen_range(0..words.len())];
                let matching: Vec<usize> = pool
                    .questions
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| q.word() == **word)
                    .map(|(i, _)| i)
                    .collect();
                return Ok(self.pick(&matching));
            }
        }

        // Rule 4: default draw. On exhaustion clear the used set and
        // retry without it; if everything is mastered, fall back to the
        // whole pool so a question is always returned.
        let all: Vec<usize> = (0..pool.len()).collect();
        let unmastered: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&i| !mastered.contains(&pool.questions[i].word()))
            .collect();

        let mut available: Vec<usize> = unmastered
            .iter()
            .copied()
            .filter(|i| !self.used_indices.contains(i))
            .collect();
        if available.is_empty() {
            self.used_indices.clear();
            available = unmastered;
        }
        if available.is_empty() {
            available = all;
        }

        let idx = self.pick(&available);
        self.used_indices.insert(idx);
        Ok(idx)
    }

    fn pick(&mut self, indices: &[usize]) -> usize {
        indices[self.rng.gen_range(0..indices.len())]
    }
}
