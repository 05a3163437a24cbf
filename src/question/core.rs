use crate::error::DrillError;
use crate::exercise::ExerciseType;
use crate::util::canonical;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::path::Path;

static POOL_DIR: Dir = include_dir!("src/pools");

/// Exercise-specific rendering payload. The selector only ever looks at
/// the common fields on [`Question`]; how a variant is presented belongs
/// to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QuestionContent {
    Emoji(String),
    ImageRef(String),
    TextPrompt(String),
    SentenceBlank(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub answer: String,
    pub content: QuestionContent,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

fn default_difficulty() -> u8 {
    1
}

impl Question {
    /// Canonical word identity of this question's answer.
    pub fn word(&self) -> String {
        canonical(&self.answer)
    }
}

#[derive(Debug, Deserialize)]
struct PoolFile {
    exercise: ExerciseType,
    questions: Vec<Question>,
}

/// Read-only, ordered question sequence for one exercise type.
#[derive(Debug, Clone)]
pub struct QuestionPool {
    pub exercise: ExerciseType,
    pub questions: Vec<Question>,
}

impl QuestionPool {
    /// Load the built-in pool shipped with the crate for `exercise`.
    /// Exercise types without a shipped table are a configuration error.
    pub fn builtin(exercise: ExerciseType) -> Result<Self, DrillError> {
        let file = POOL_DIR
            .get_file(format!("{exercise}.json"))
            .ok_or_else(|| DrillError::UnknownExercise(exercise.to_string()))?;
        let raw = file
            .contents_utf8()
            .ok_or_else(|| DrillError::UnknownExercise(exercise.to_string()))?;
        Self::parse(raw)
    }

    /// Load a pool from a user-supplied JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DrillError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, DrillError> {
        let file: PoolFile = serde_json::from_str(raw)?;
        Ok(Self {
            exercise: file.exercise,
            questions: file.questions,
        })
    }

    /// Mix user-authored questions into the pool. They are always
    /// flagged custom regardless of what the source file said.
    pub fn extend_custom(&mut self, questions: Vec<Question>) {
        self.questions.extend(questions.into_iter().map(|mut q| {
            q.is_custom = true;
            q
        }));
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Indices of custom questions, in pool order.
    pub fn custom_indices(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.is_custom)
            .map(|(i, _)| i)
            .collect()
    }

    /// First question whose answer matches `word` (canonical form).
    pub fn find_by_word(&self, word: &str) -> Option<&Question> {
        let word = canonical(word);
        self.questions.iter().find(|q| q.word() == word)
    }
}
