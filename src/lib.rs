// Library surface for the drill engine and integration tests.
// Terminal presentation lives in main.rs; keep this lean.
pub mod app_dirs;
pub mod drill;
pub mod error;
pub mod exercise;
pub mod progress;
pub mod question;
pub mod review;
pub mod session;
pub mod settings;
pub mod store;
pub mod tracking;
pub mod util;

pub use error::DrillError;
pub use exercise::ExerciseType;
