pub mod question_selection_service;
pub mod quiz_service;
pub mod review_service;
pub mod scoring_service;

pub use question_selection_service::{DifficultyMix, QuestionSelectionService};
pub use quiz_service::{ExamOptions, QuizService};
pub use review_service::{ReviewFilter, ReviewService};
pub use scoring_service::{GradedQuestion, ScoringService};
