pub mod answer;
pub mod inline_check;
pub mod question;
pub mod question_bank;
pub mod quiz_session;
pub mod score;
pub use answer::{AnswerSelection, RevisionPolicy};
pub use inline_check::InlineCheck;
pub use question::{Difficulty, Question, QuestionId};
pub use question_bank::{BankSummary, QuestionBank};
pub use quiz_session::{QuizSession, SessionCommand, SessionStatus};
pub use score::{Score, Verdict};
