pub mod question_bank_repository;

pub use question_bank_repository::{
    parse_bank, BuiltinQuestionBankRepository, FileQuestionBankRepository,
    InMemoryQuestionBankRepository, QuestionBankRepository,
};

#[cfg(test)]
pub use question_bank_repository::MockQuestionBankRepository;
