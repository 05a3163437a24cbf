use crate::error::DrillError;
use crate::question::{Question, QuestionPool, QuestionSelector};
use crate::review::ReviewScheduler;
use crate::session::{SessionResult, SessionTally};
use crate::tracking::WordStatsTracker;
use crate::util::canonical;

/// One running exercise session. Owns the selection policy and the
/// trackers, and is the only mutation path from the front end into them:
/// `on_answer`, `on_hint`, and `on_skip` are the answer-event boundary.
pub struct Drill {
    pool: QuestionPool,
    selector: QuestionSelector,
    tracker: WordStatsTracker,
    scheduler: ReviewScheduler,
    tally: SessionTally,
    current: Option<usize>,
}

impl std::fmt::Debug for Drill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drill")
            .field("pool", &self.pool)
            .field("tally", &self.tally)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Drill {
    /// Start a session over `pool`. An empty pool is a configuration
    /// error reported before any question is shown.
    pub fn new(
        pool: QuestionPool,
        selector: QuestionSelector,
        tracker: WordStatsTracker,
        scheduler: ReviewScheduler,
    ) -> Result<Self, DrillError> {
        if pool.is_empty() {
            return Err(DrillError::EmptyPool(pool.exercise));
        }
        let mut tally = SessionTally::new(pool.exercise);
        tally.start();
        Ok(Self {
            pool,
            selector,
            tracker,
            scheduler,
            tally,
            current: None,
        })
    }

    /// Select and return the next question. The mastered and problem
    /// snapshots are taken fresh for every turn.
    pub fn next_question(&mut self) -> Result<&Question, DrillError> {
        let mastered = self.tracker.mastered_words();
        let problems = self.tracker.problem_words();
        let idx = self.selector.next(&self.pool, &mastered, &problems)?;
        self.current = Some(idx);
        Ok(&self.pool.questions[idx])
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.map(|idx| &self.pool.questions[idx])
    }

    /// Compare a typed answer against the current question.
    pub fn check_answer(&self, given: &str) -> bool {
        self.current_question()
            .map(|q| q.word() == canonical(given))
            .unwrap_or(false)
    }

    /// Record the outcome of the current question: word stats, review
    /// queue, and the session tally, in that order.
    pub fn on_answer(&mut self, correct: bool) {
        let Some(question) = self.current_question().cloned() else {
            return;
        };
        self.tracker
            .record_answer(&question.answer, correct, self.pool.exercise);
        if correct {
            self.scheduler
                .record_success(&question.answer, self.pool.exercise);
        } else {
            self.scheduler
                .add_word(&question.answer, self.pool.exercise, question.difficulty);
        }
        self.tally.record_outcome(correct);
    }

    pub fn on_hint(&mut self) {
        self.tally.record_hint();
    }

    /// A skip queues the word for review without charging an attempt
    /// against the word record: it expresses avoidance, not an answer.
    pub fn on_skip(&mut self) {
        if let Some(question) = self.current_question().cloned() {
            self.scheduler
                .add_word(&question.answer, self.pool.exercise, question.difficulty);
        }
    }

    pub fn exercise(&self) -> crate::exercise::ExerciseType {
        self.pool.exercise
    }

    pub fn tracker(&self) -> &WordStatsTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    /// Close the session and produce its summary. Dropping a `Drill`
    /// without calling this abandons the session: per-word state already
    /// written stays, but no session result is produced.
    pub fn finish(self) -> SessionResult {
        self.tally.finish()
    }
}

/// Build the question list for a review session from the scheduler's
/// priority queue. Entries whose word no longer has a matching question
/// (deleted custom content, changed pool) are skipped, not errors.
pub fn review_pool(pool: &QuestionPool, scheduler: &ReviewScheduler, count: usize) -> QuestionPool {
    let questions: Vec<Question> = scheduler
        .words_for_review(pool.exercise, count)
        .into_iter()
        .filter_map(|entry| pool.find_by_word(&entry.word).cloned())
        .collect();
    QuestionPool {
        exercise: pool.exercise,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseType;
    use crate::question::core::QuestionContent;
    use crate::settings::{FixedSettings, Settings};
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_pool(words: &[&str]) -> QuestionPool {
        QuestionPool {
            exercise: ExerciseType::Naming,
            questions: words
                .iter()
                .map(|w| Question {
                    answer: w.to_string(),
                    content: QuestionContent::TextPrompt(format!("name '{w}'")),
                    options: vec![],
                    is_custom: false,
                    difficulty: 1,
                })
                .collect(),
        }
    }

    fn test_drill(words: &[&str]) -> Drill {
        let tracker = WordStatsTracker::new(
            Box::new(MemoryStore::new()),
            Box::new(FixedSettings(Settings::default())),
        );
        let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
        let selector = QuestionSelector::with_rng(0.0, Box::new(StdRng::seed_from_u64(2)));
        Drill::new(test_pool(words), selector, tracker, scheduler).unwrap()
    }

    #[test]
    fn test_empty_pool_rejected_at_start() {
        let tracker = WordStatsTracker::new(
            Box::new(MemoryStore::new()),
            Box::new(FixedSettings(Settings::default())),
        );
        let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
        let selector = QuestionSelector::new(0.4);
        let err = Drill::new(test_pool(&[]), selector, tracker, scheduler).unwrap_err();
        assert_matches!(err, DrillError::EmptyPool(ExerciseType::Naming));
    }

    #[test]
    fn test_answer_flow_updates_all_components() {
        let mut drill = test_drill(&["dog", "cat"]);

        drill.next_question().unwrap();
        drill.on_answer(false);

        let word = drill.current_question().unwrap().word();
        assert!(drill.tracker().problem_words().contains_key(&word));
        assert_eq!(drill.scheduler().all_entries().len(), 1);

        let result = drill.finish();
        assert_eq!(result.total, 1);
        assert_eq!(result.correct, 0);
    }

    #[test]
    fn test_correct_answer_credits_review_entry() {
        let mut drill = test_drill(&["dog"]);

        drill.next_question().unwrap();
        drill.on_answer(false);
        for _ in 0..3 {
            drill.next_question().unwrap();
            drill.on_answer(true);
        }
        // Three successes graduate the entry out of the review queue.
        assert!(drill.scheduler().all_entries().is_empty());
    }

    #[test]
    fn test_check_answer_is_case_insensitive() {
        let mut drill = test_drill(&["dog"]);
        drill.next_question().unwrap();
        assert!(drill.check_answer("  DOG "));
        assert!(!drill.check_answer("cat"));
    }

    #[test]
    fn test_skip_schedules_review_without_an_attempt() {
        let mut drill = test_drill(&["dog"]);
        drill.next_question().unwrap();
        drill.on_skip();

        assert_eq!(drill.scheduler().all_entries().len(), 1);
        let word = drill.current_question().unwrap().word();
        assert!(drill.tracker().word_record(&word).is_none());
        assert_eq!(drill.finish().total, 0);
    }

    #[test]
    fn test_hint_counted_in_result() {
        let mut drill = test_drill(&["dog"]);
        drill.next_question().unwrap();
        drill.on_hint();
        drill.on_answer(true);

        let result = drill.finish();
        assert_eq!(result.hints_used, 1);
        assert_eq!(result.accuracy, 100);
    }

    #[test]
    fn test_answer_before_first_question_is_ignored() {
        let mut drill = test_drill(&["dog"]);
        drill.on_answer(true);
        assert_eq!(drill.finish().total, 0);
    }

    #[test]
    fn test_review_pool_orders_and_skips_dangling() {
        let pool = test_pool(&["dog", "cat"]);
        let mut scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
        scheduler.add_word("cat", ExerciseType::Naming, 1);
        scheduler.add_word("cat", ExerciseType::Naming, 1);
        scheduler.add_word("dog", ExerciseType::Naming, 1);
        scheduler.add_word("gone", ExerciseType::Naming, 1);

        let review = review_pool(&pool, &scheduler, 10);
        let words: Vec<String> = review.questions.iter().map(|q| q.word()).collect();
        // "gone" has no question and is dropped; "cat" outranks "dog"
        // on miss count.
        assert_eq!(words, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn test_review_pool_empty_when_nothing_queued() {
        let pool = test_pool(&["dog"]);
        let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
        assert!(review_pool(&pool, &scheduler, 10).is_empty());
    }
}
