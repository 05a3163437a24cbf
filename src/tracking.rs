use crate::exercise::ExerciseType;
use crate::settings::SettingsProvider;
use crate::store::{self, PersistentStore};
use crate::util::{canonical, percent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const WORD_STATS_KEY: &str = "word_stats";
const PROBLEM_WORDS_KEY: &str = "problem_words";
const MASTERED_WORDS_KEY: &str = "mastered_words";

/// Consecutive correct answers that clear a word's problem status.
pub const REMEDIATION_STREAK: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStat {
    pub attempts: u32,
    pub correct: u32,
}

/// Lifetime attempt history for one word, shared across exercise types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub incorrect_attempts: u32,
    pub consecutive_correct: u32,
    pub last_seen: DateTime<Utc>,
    pub per_exercise: HashMap<String, ExerciseStat>,
}

impl WordRecord {
    fn new(word: &str, now: DateTime<Utc>) -> Self {
        Self {
            word: word.to_string(),
            total_attempts: 0,
            correct_attempts: 0,
            incorrect_attempts: 0,
            consecutive_correct: 0,
            last_seen: now,
            per_exercise: HashMap::new(),
        }
    }
}

/// Membership record for a word currently flagged as a problem word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemEntry {
    pub added_at: DateTime<Utc>,
    pub attempts: u32,
    pub incorrect: u32,
}

/// Membership record for a mastered word, with snapshots taken at the
/// moment the threshold was crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteredEntry {
    pub mastered_at: DateTime<Utc>,
    pub total_attempts: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSummary {
    pub total_words: usize,
    pub problem_count: usize,
    pub mastered_count: usize,
}

/// Per-word attempt history, streaks, and problem/mastered membership.
/// A word is never in both sets at once: problem clearing is applied
/// before the mastery check within a single update, so mastery is only
/// ever entered from a problem-free state.
pub struct WordStatsTracker {
    store: Box<dyn PersistentStore>,
    settings: Box<dyn SettingsProvider>,
}

impl WordStatsTracker {
    pub fn new(store: Box<dyn PersistentStore>, settings: Box<dyn SettingsProvider>) -> Self {
        Self { store, settings }
    }

    /// Record one answer event for `word`. Updates counters and streaks,
    /// then problem membership, then mastered membership, in that order.
    pub fn record_answer(&mut self, word: &str, correct: bool, exercise: ExerciseType) {
        let word = canonical(word);
        if word.is_empty() {
            return;
        }
        let now = Utc::now();

        let mut records: HashMap<String, WordRecord> =
            store::load_or(self.store.as_ref(), WORD_STATS_KEY, HashMap::new());
        let mut problems: HashMap<String, ProblemEntry> =
            store::load_or(self.store.as_ref(), PROBLEM_WORDS_KEY, HashMap::new());
        let mut mastered: HashMap<String, MasteredEntry> =
            store::load_or(self.store.as_ref(), MASTERED_WORDS_KEY, HashMap::new());

        let record = records
            .entry(word.clone())
            .or_insert_with(|| WordRecord::new(&word, now));
        record.total_attempts += 1;
        record.last_seen = now;

        if correct {
            record.consecutive_correct += 1;

            if problems.contains_key(&word) && record.consecutive_correct >= REMEDIATION_STREAK {
                problems.remove(&word);
            }

            let threshold = self.settings.settings().mastery_threshold;
            if !problems.contains_key(&word)
                && !mastered.contains_key(&word)
                && record.consecutive_correct >= threshold
            {
                // The accuracy snapshot excludes the answer that crossed
                // the threshold: it has been counted as an attempt but its
                // correct counter has not landed yet.
                mastered.insert(
                    word.clone(),
                    MasteredEntry {
                        mastered_at: now,
                        total_attempts: record.total_attempts,
                        accuracy: percent(record.correct_attempts, record.total_attempts),
                    },
                );
            }

            record.correct_attempts += 1;
        } else {
            record.incorrect_attempts += 1;
            record.consecutive_correct = 0;

            if !mastered.contains_key(&word) {
                let added_at = problems.get(&word).map(|p| p.added_at).unwrap_or(now);
                problems.insert(
                    word.clone(),
                    ProblemEntry {
                        added_at,
                        attempts: record.total_attempts,
                        incorrect: record.incorrect_attempts,
                    },
                );
            }
        }

        let per = record.per_exercise.entry(exercise.to_string()).or_default();
        per.attempts += 1;
        if correct {
            per.correct += 1;
        }

        store::save(self.store.as_mut(), WORD_STATS_KEY, &records);
        store::save(self.store.as_mut(), PROBLEM_WORDS_KEY, &problems);
        store::save(self.store.as_mut(), MASTERED_WORDS_KEY, &mastered);
    }

    /// Words excluded from the active question pool.
    pub fn mastered_words(&self) -> HashSet<String> {
        self.mastered_entries().into_keys().collect()
    }

    pub fn mastered_entries(&self) -> HashMap<String, MasteredEntry> {
        store::load_or(self.store.as_ref(), MASTERED_WORDS_KEY, HashMap::new())
    }

    /// Words the selector boosts for remediation.
    pub fn problem_words(&self) -> HashMap<String, ProblemEntry> {
        store::load_or(self.store.as_ref(), PROBLEM_WORDS_KEY, HashMap::new())
    }

    pub fn word_record(&self, word: &str) -> Option<WordRecord> {
        let records: HashMap<String, WordRecord> =
            store::load_or(self.store.as_ref(), WORD_STATS_KEY, HashMap::new());
        records.get(&canonical(word)).cloned()
    }

    /// User-driven: drop the problem flag and restart the streak.
    pub fn reset_problem_word(&mut self, word: &str) {
        let word = canonical(word);
        let mut problems: HashMap<String, ProblemEntry> =
            store::load_or(self.store.as_ref(), PROBLEM_WORDS_KEY, HashMap::new());
        problems.remove(&word);
        store::save(self.store.as_mut(), PROBLEM_WORDS_KEY, &problems);

        let mut records: HashMap<String, WordRecord> =
            store::load_or(self.store.as_ref(), WORD_STATS_KEY, HashMap::new());
        if let Some(record) = records.get_mut(&word) {
            record.consecutive_correct = 0;
            store::save(self.store.as_mut(), WORD_STATS_KEY, &records);
        }
    }

    /// User-driven "practice again": put a mastered word back in play.
    pub fn unmaster_word(&mut self, word: &str) {
        let word = canonical(word);
        let mut mastered: HashMap<String, MasteredEntry> =
            store::load_or(self.store.as_ref(), MASTERED_WORDS_KEY, HashMap::new());
        mastered.remove(&word);
        store::save(self.store.as_mut(), MASTERED_WORDS_KEY, &mastered);
    }

    pub fn summary(&self) -> TrackingSummary {
        let records: HashMap<String, WordRecord> =
            store::load_or(self.store.as_ref(), WORD_STATS_KEY, HashMap::new());
        TrackingSummary {
            total_words: records.len(),
            problem_count: self.problem_words().len(),
            mastered_count: self.mastered_entries().len(),
        }
    }
}
