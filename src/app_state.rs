use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{
        BuiltinQuestionBankRepository, FileQuestionBankRepository, QuestionBankRepository,
    },
    services::quiz_service::QuizService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let repository: Arc<dyn QuestionBankRepository> = match &config.bank_dir {
            Some(dir) => Arc::new(FileQuestionBankRepository::load(dir)?),
            None => Arc::new(BuiltinQuestionBankRepository::new()),
        };

        Self::with_repository(config, repository)
    }

    pub fn with_repository(
        config: Config,
        repository: Arc<dyn QuestionBankRepository>,
    ) -> AppResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let quiz_service = Arc::new(QuizService::new(repository, config.clone()));

        Ok(Self {
            quiz_service,
            config,
        })
    }
}
