use crate::exercise::ExerciseType;
use crate::store::{self, PersistentStore};
use crate::util::canonical;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

const REVIEW_WORDS_KEY: &str = "review_words";

/// Success streak at which an entry graduates out of the review queue.
pub const GRADUATION_STREAK: u32 = 3;

/// One missed word queued for spaced-repetition review. Keyed by
/// `(word, exercise)` because remediation content differs per exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub word: String,
    pub exercise: ExerciseType,
    pub times_missed: u32,
    pub times_correct: u32,
    pub success_streak: u32,
    pub last_practiced: DateTime<Utc>,
    pub added_date: DateTime<Utc>,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeStats {
    pub count: usize,
    pub total_missed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
    pub total_words: usize,
    pub by_type: HashMap<String, TypeStats>,
    pub oldest_word: Option<DateTime<Utc>>,
}

/// Cross-session queue of missed words, priority-ordered for review.
pub struct ReviewScheduler {
    store: Box<dyn PersistentStore>,
}

impl ReviewScheduler {
    pub fn new(store: Box<dyn PersistentStore>) -> Self {
        Self { store }
    }

    fn entries(&self) -> Vec<ReviewEntry> {
        store::load_or(self.store.as_ref(), REVIEW_WORDS_KEY, Vec::new())
    }

    fn save_entries(&mut self, entries: &[ReviewEntry]) {
        store::save(self.store.as_mut(), REVIEW_WORDS_KEY, &entries);
    }

    /// Queue a missed word. Re-adding an existing entry resets its
    /// success streak and bumps the miss counter; the original
    /// `added_date` is kept so insertion order stays stable.
    pub fn add_word(&mut self, word: &str, exercise: ExerciseType, difficulty: u8) {
        let word = canonical(word);
        if word.is_empty() {
            return;
        }
        let now = Utc::now();

        let mut entries = self.entries();
        match entries
            .iter_mut()
            .find(|e| e.word == word && e.exercise == exercise)
        {
            Some(entry) => {
                entry.times_missed += 1;
                entry.success_streak = 0;
                entry.last_practiced = now;
            }
            None => entries.push(ReviewEntry {
                word,
                exercise,
                times_missed: 1,
                times_correct: 0,
                success_streak: 0,
                last_practiced: now,
                added_date: now,
                difficulty,
            }),
        }
        self.save_entries(&entries);
    }

    /// Credit a correct review answer; removes the entry once the streak
    /// reaches the graduation threshold. No-op when the entry is absent.
    pub fn record_success(&mut self, word: &str, exercise: ExerciseType) {
        let word = canonical(word);
        let mut entries = self.entries();

        let Some(entry) = entries
            .iter_mut()
            .find(|e| e.word == word && e.exercise == exercise)
        else {
            return;
        };
        entry.times_correct += 1;
        entry.success_streak += 1;
        entry.last_practiced = Utc::now();

        if entry.success_streak >= GRADUATION_STREAK {
            entries.retain(|e| !(e.word == word && e.exercise == exercise));
        }
        self.save_entries(&entries);
    }

    /// The top `count` entries for one exercise type, highest priority
    /// first. Pure function of stored state; an exercise with no entries
    /// yields an empty list.
    pub fn words_for_review(&self, exercise: ExerciseType, count: usize) -> Vec<ReviewEntry> {
        let now = Utc::now();
        self.entries()
            .into_iter()
            .filter(|e| e.exercise == exercise)
            .map(|e| {
                let score = priority(&e, now);
                (e, score)
            })
            .sorted_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.added_date.cmp(&b.0.added_date))
            })
            .take(count)
            .map(|(e, _)| e)
            .collect()
    }

    pub fn all_entries(&self) -> Vec<ReviewEntry> {
        self.entries()
    }

    pub fn stats(&self) -> ReviewStats {
        let entries = self.entries();
        let mut by_type: HashMap<String, TypeStats> = HashMap::new();
        for entry in &entries {
            let stats = by_type.entry(entry.exercise.to_string()).or_default();
            stats.count += 1;
            stats.total_missed += entry.times_missed;
        }
        ReviewStats {
            total_words: entries.len(),
            oldest_word: entries.iter().map(|e| e.added_date).min(),
            by_type,
        }
    }
}

/// Words missed often, not practiced lately, and without a running
/// streak come first. Recency credit is capped at a day; a fresh streak
/// can push the score negative, ranking the entry last.
fn priority(entry: &ReviewEntry, now: DateTime<Utc>) -> f64 {
    let hours_since = (now - entry.last_practiced).num_seconds().max(0) as f64 / 3600.0;
    entry.times_missed as f64 * 2.0 + hours_since.min(24.0) - entry.success_streak as f64 * 3.0
}
