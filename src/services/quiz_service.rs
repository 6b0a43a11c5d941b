use std::sync::Arc;

use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        BankSummary, InlineCheck, QuestionBank, QuestionId, QuizSession, RevisionPolicy,
    },
    repositories::QuestionBankRepository,
    services::question_selection_service::{DifficultyMix, QuestionSelectionService},
};

/// Options for drawing a mock exam from a bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExamOptions {
    pub question_count: Option<usize>,
    pub seed: Option<u64>,
    pub mix: DifficultyMix,
}

pub struct QuizService {
    repository: Arc<dyn QuestionBankRepository>,
    config: Arc<Config>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuestionBankRepository>, config: Arc<Config>) -> Self {
        Self { repository, config }
    }

    pub fn list_banks(&self) -> AppResult<Vec<BankSummary>> {
        self.repository.list()
    }

    pub fn get_bank(&self, id: &str) -> AppResult<Arc<QuestionBank>> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| AppError::NotFound(format!("Question bank '{}' not found", id)))
    }

    /// One question from a bank as a standalone knowledge check.
    pub fn start_inline_check(
        &self,
        bank_id: &str,
        question_id: &QuestionId,
    ) -> AppResult<InlineCheck> {
        let bank = self.get_bank(bank_id)?;
        let question = bank.get(question_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Question '{}' not found in bank '{}'",
                question_id, bank_id
            ))
        })?;

        Ok(InlineCheck::new(question.clone()).with_policy(self.policy()))
    }

    /// The whole bank as a graded quiz, in authored order.
    pub fn start_quiz(&self, bank_id: &str) -> AppResult<QuizSession> {
        let bank = self.get_bank(bank_id)?;
        self.session_for(bank)
    }

    /// A timed exam drawn at random from the bank.
    pub fn start_mock_exam(&self, bank_id: &str, options: ExamOptions) -> AppResult<QuizSession> {
        let bank = self.get_bank(bank_id)?;
        let count = options
            .question_count
            .or(bank.exam_question_count())
            .unwrap_or(self.config.exam_question_count);

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let exam = QuestionSelectionService::select_balanced(&bank, count, options.mix, &mut rng)?;

        let time_limit = match bank.time_limit_secs() {
            Some(secs) => Duration::try_seconds(i64::from(secs)),
            None => Duration::try_minutes(self.config.exam_time_limit_mins),
        }
        .ok_or_else(|| {
            AppError::ConfigurationError(format!("time limit for '{}' is out of range", bank_id))
        })?;

        log::info!(
            "Drew {} of {} questions from '{}' for a mock exam ({} min)",
            exam.len(),
            bank.len(),
            bank_id,
            time_limit.num_minutes()
        );

        self.session_for(Arc::new(exam))?.with_time_limit(time_limit)
    }

    fn session_for(&self, bank: Arc<QuestionBank>) -> AppResult<QuizSession> {
        let threshold = bank
            .pass_threshold()
            .unwrap_or(self.config.default_pass_threshold);
        QuizSession::new(bank)
            .with_policy(self.policy())
            .with_pass_threshold(threshold)
    }

    fn policy(&self) -> RevisionPolicy {
        RevisionPolicy::from_flag(self.config.allow_revision)
    }
}
