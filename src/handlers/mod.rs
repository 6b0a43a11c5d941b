pub mod quiz_handler;
pub mod session_loop;

pub use quiz_handler::{check, exam, list_banks, quiz, review, schema};
