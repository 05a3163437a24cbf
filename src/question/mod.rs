pub mod core;
pub mod selector;

// Re-export the main types for convenience
pub use core::{Question, QuestionContent, QuestionPool};
pub use selector::QuestionSelector;
