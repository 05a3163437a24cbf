use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use wordbridge::drill::Drill;
use wordbridge::exercise::ExerciseType;
use wordbridge::question::{QuestionPool, QuestionSelector};
use wordbridge::review::ReviewScheduler;
use wordbridge::settings::{FixedSettings, Settings};
use wordbridge::store::{MemoryStore, SqliteStore};
use wordbridge::tracking::WordStatsTracker;

/// End-to-end drill flows: selection, tracking, review, and results all
/// observed through the public engine surface.

fn tracker_with_threshold(threshold: u32) -> WordStatsTracker {
    WordStatsTracker::new(
        Box::new(MemoryStore::new()),
        Box::new(FixedSettings(Settings {
            mastery_threshold: threshold,
            custom_frequency: 0.0,
        })),
    )
}

fn drill_over_builtin(exercise: ExerciseType, seed: u64) -> Drill {
    let pool = QuestionPool::builtin(exercise).unwrap();
    let selector = QuestionSelector::with_rng(0.0, Box::new(StdRng::seed_from_u64(seed)));
    let tracker = tracker_with_threshold(5);
    let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
    Drill::new(pool, selector, tracker, scheduler).unwrap()
}

#[test]
fn drill_session_word_lifecycle_to_mastery() {
    // Single-question pool pins which word every turn is about.
    let mut pool = QuestionPool::builtin(ExerciseType::Naming).unwrap();
    pool.questions.truncate(1);
    let word = pool.questions[0].word();

    let selector = QuestionSelector::with_rng(0.0, Box::new(StdRng::seed_from_u64(1)));
    let tracker = tracker_with_threshold(5);
    let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
    let mut drill = Drill::new(pool, selector, tracker, scheduler).unwrap();

    // Miss once: problem word and review entry appear.
    drill.next_question().unwrap();
    drill.on_answer(false);
    assert!(drill.tracker().problem_words().contains_key(&word));
    assert_eq!(drill.scheduler().all_entries().len(), 1);

    // Three consecutive corrects clear both problem flag and review queue.
    for _ in 0..3 {
        drill.next_question().unwrap();
        drill.on_answer(true);
    }
    assert!(!drill.tracker().problem_words().contains_key(&word));
    assert!(drill.scheduler().all_entries().is_empty());

    // Two more corrects cross the mastery threshold with the documented
    // accuracy snapshot.
    for _ in 0..2 {
        drill.next_question().unwrap();
        drill.on_answer(true);
    }
    let mastered = drill.tracker().mastered_entries();
    let entry = mastered.get(&word).unwrap();
    assert_eq!(entry.total_attempts, 6);
    assert_eq!(entry.accuracy, 67);

    let result = drill.finish();
    assert_eq!(result.total, 6);
    assert_eq!(result.correct, 5);
    assert_eq!(result.accuracy, 83);
}

#[test]
fn drill_session_covers_whole_pool_without_starvation() {
    let pool = QuestionPool::builtin(ExerciseType::Rhyming).unwrap();
    let pool_size = pool.len();
    let mut drill = drill_over_builtin(ExerciseType::Rhyming, 21);

    let mut seen = HashSet::new();
    for _ in 0..pool_size + 1 {
        let answer = drill.next_question().unwrap().answer.clone();
        seen.insert(answer);
        drill.on_answer(true);
    }
    assert_eq!(seen.len(), pool_size);
}

#[test]
fn drill_selector_never_fails_over_many_turns() {
    let mut drill = drill_over_builtin(ExerciseType::Categories, 33);
    for turn in 0..100 {
        let question = drill.next_question().unwrap().clone();
        assert!(!question.answer.is_empty());
        // Alternate outcomes to churn problem and mastered membership.
        drill.on_answer(turn % 3 != 0);
    }
    let result = drill.finish();
    assert_eq!(result.total, 100);
}

#[test]
fn drill_abandonment_leaves_no_session_result_but_keeps_word_state() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("words.db");

    {
        let tracker = WordStatsTracker::new(
            Box::new(SqliteStore::open(&db_path).unwrap()),
            Box::new(FixedSettings(Settings::default())),
        );
        let scheduler = ReviewScheduler::new(Box::new(SqliteStore::open(&db_path).unwrap()));
        let pool = QuestionPool::builtin(ExerciseType::Naming).unwrap();
        let selector = QuestionSelector::with_rng(0.0, Box::new(StdRng::seed_from_u64(4)));
        let mut drill = Drill::new(pool, selector, tracker, scheduler).unwrap();

        drill.next_question().unwrap();
        drill.on_answer(false);
        // Dropped without finish(): the session is abandoned.
    }

    // Per-word state survived the abandonment; it was written at answer
    // time, not at session close.
    let tracker = WordStatsTracker::new(
        Box::new(SqliteStore::open(&db_path).unwrap()),
        Box::new(FixedSettings(Settings::default())),
    );
    assert_eq!(tracker.problem_words().len(), 1);
}

#[test]
fn custom_questions_open_the_session() {
    let mut pool = QuestionPool::builtin(ExerciseType::Naming).unwrap();
    pool.extend_custom(vec![wordbridge::question::Question {
        answer: "ferret".to_string(),
        content: wordbridge::question::QuestionContent::Emoji("🦡".to_string()),
        options: vec![],
        is_custom: false,
        difficulty: 2,
    }]);

    let selector = QuestionSelector::with_rng(0.0, Box::new(StdRng::seed_from_u64(8)));
    let tracker = tracker_with_threshold(5);
    let scheduler = ReviewScheduler::new(Box::new(MemoryStore::new()));
    let mut drill = Drill::new(pool, selector, tracker, scheduler).unwrap();

    let first = drill.next_question().unwrap();
    assert_eq!(first.answer, "ferret");
    assert!(first.is_custom);
}

#[test]
fn tracking_state_is_shared_across_exercise_types() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("words.db");

    let mut tracker = WordStatsTracker::new(
        Box::new(SqliteStore::open(&db_path).unwrap()),
        Box::new(FixedSettings(Settings::default())),
    );
    tracker.record_answer("chair", false, ExerciseType::Naming);
    tracker.record_answer("chair", true, ExerciseType::Rhyming);

    let record = tracker.word_record("chair").unwrap();
    assert_eq!(record.total_attempts, 2);
    assert_eq!(record.per_exercise.len(), 2);
    // One identity, one problem entry, regardless of exercise type.
    assert_eq!(tracker.problem_words().len(), 1);
}
