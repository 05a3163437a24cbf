use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use wordbridge::drill::{review_pool, Drill};
use wordbridge::error::DrillError;
use wordbridge::exercise::ExerciseType;
use wordbridge::progress::ProgressLog;
use wordbridge::question::{Question, QuestionContent, QuestionPool, QuestionSelector};
use wordbridge::review::ReviewScheduler;
use wordbridge::session::SessionResult;
use wordbridge::settings::{Settings, StoreSettings};
use wordbridge::store::{MemoryStore, PersistentStore, SqliteStore};
use wordbridge::tracking::WordStatsTracker;

/// adaptive vocabulary drills in the terminal
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Vocabulary drills that adapt to you: problem words come back more often, \
mastered words retire from the pool, and missed words are queued for spaced review."
)]
struct Cli {
    /// exercise type to drill (naming, rhyming, categories, sentence-completion, ...)
    #[clap(short, long, default_value = "naming")]
    exercise: ExerciseType,

    /// number of questions in the session
    #[clap(short, long, default_value_t = 10)]
    number_of_questions: usize,

    /// JSON file with custom questions to mix into the pool
    #[clap(short, long)]
    custom_pool: Option<PathBuf>,

    /// drill only words queued for review
    #[clap(long)]
    review: bool,

    /// print mastery, review, and progress summaries and exit
    #[clap(long)]
    stats: bool,

    /// clear all stored tracking data and exit
    #[clap(long)]
    reset: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("wordbridge: {err}");
        std::process::exit(2);
    }
}

/// Open the backing store, degrading to an in-memory store when the
/// database cannot be opened: the session still runs, it just leaves no
/// cross-session memory behind.
fn open_store() -> Box<dyn PersistentStore> {
    match SqliteStore::new() {
        Ok(store) => Box::new(store),
        Err(_) => Box::new(MemoryStore::new()),
    }
}

fn run(cli: &Cli) -> Result<(), DrillError> {
    if cli.reset {
        let mut store = open_store();
        store.clear()?;
        println!("all stored tracking data cleared");
        return Ok(());
    }

    let tracker = WordStatsTracker::new(open_store(), Box::new(StoreSettings::new(open_store())));
    let scheduler = ReviewScheduler::new(open_store());

    if cli.stats {
        print_stats(&tracker, &scheduler);
        return Ok(());
    }

    let mut pool = QuestionPool::builtin(cli.exercise)?;
    if let Some(path) = &cli.custom_pool {
        let custom = QuestionPool::from_file(path)?;
        pool.extend_custom(custom.questions);
    }
    if cli.review {
        pool = review_pool(&pool, &scheduler, cli.number_of_questions);
        if pool.is_empty() {
            println!("nothing to review for '{}' - well done!", cli.exercise);
            return Ok(());
        }
    }

    let turns = if cli.review {
        pool.len()
    } else {
        cli.number_of_questions
    };

    let settings = {
        let store = open_store();
        Settings::load(store.as_ref())
    };
    let selector = QuestionSelector::new(settings.custom_frequency);
    let mut drill = Drill::new(pool, selector, tracker, scheduler)?;

    println!(
        "WordBridge - {} drill. Type your answer, '?' for a hint, '!' to skip, 'q' to quit.",
        cli.exercise
    );
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for turn in 1..=turns {
        let question = drill.next_question()?.clone();
        println!("[{turn}/{turns}] {}", render(&question));
        if !question.options.is_empty() {
            println!("    options: {}", question.options.join(", "));
        }

        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                // EOF behaves like quitting mid-session.
                return finalize(drill);
            };
            let input = line?.trim().to_string();
            match input.as_str() {
                "q" | "quit" => return finalize(drill),
                "?" => {
                    drill.on_hint();
                    if let Some(first) = question.answer.chars().next() {
                        println!("    hint: it starts with '{first}'");
                    }
                }
                "!" => {
                    drill.on_skip();
                    println!("    skipped - queued for review");
                    break;
                }
                "" => {}
                _ => {
                    let correct = drill.check_answer(&input);
                    drill.on_answer(correct);
                    if correct {
                        println!("    correct!");
                    } else {
                        println!("    not quite - it was '{}'", question.answer);
                    }
                    break;
                }
            }
        }
        println!();
    }

    finalize(drill)
}

fn finalize(drill: Drill) -> Result<(), DrillError> {
    let result = drill.finish();
    if result.total == 0 {
        return Ok(());
    }
    print_result(&result);
    if let Some(log) = ProgressLog::new() {
        let _ = log.append(&result);
    }
    Ok(())
}

fn render(question: &Question) -> String {
    match &question.content {
        QuestionContent::Emoji(emoji) => format!("name this: {emoji}"),
        QuestionContent::ImageRef(image) => format!("name the picture: {image}"),
        QuestionContent::TextPrompt(prompt) => prompt.clone(),
        QuestionContent::SentenceBlank(sentence) => format!("complete: {sentence}"),
    }
}

fn print_result(result: &SessionResult) {
    println!(
        "session done: {}/{} correct ({}%), {} hint(s), {:.0}s",
        result.correct, result.total, result.accuracy, result.hints_used, result.elapsed_seconds
    );
}

fn print_stats(tracker: &WordStatsTracker, scheduler: &ReviewScheduler) {
    let tracking = tracker.summary();
    println!("words practiced: {}", tracking.total_words);
    println!("problem words:   {}", tracking.problem_count);
    println!("mastered words:  {}", tracking.mastered_count);

    let review = scheduler.stats();
    println!("review queue:    {}", review.total_words);
    let mut types: Vec<_> = review.by_type.iter().collect();
    types.sort_by(|a, b| a.0.cmp(b.0));
    for (exercise, stats) in types {
        println!(
            "  {exercise}: {} word(s), {} miss(es)",
            stats.count, stats.total_missed
        );
    }
    if let Some(oldest) = review.oldest_word {
        println!("oldest review entry: {}", oldest.format("%Y-%m-%d"));
    }

    if let Some(log) = ProgressLog::new() {
        let progress = log.summary();
        if progress.sessions > 0 {
            println!(
                "sessions logged: {} ({} questions, {:.0}% mean accuracy)",
                progress.sessions, progress.questions, progress.mean_accuracy
            );
        }
    }
}
