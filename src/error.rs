use crate::exercise::ExerciseType;
use thiserror::Error;

/// Errors surfaced by the drill engine. Configuration problems are fatal
/// and stop a session from starting; storage trouble never reaches this
/// type (stores degrade to defaults instead).
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("no questions configured for exercise '{0}'")]
    EmptyPool(ExerciseType),

    #[error("unknown exercise type '{0}'")]
    UnknownExercise(String),

    #[error("failed to parse question pool: {0}")]
    Pool(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
