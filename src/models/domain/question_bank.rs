use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Question, QuestionId};

/// Ordered, immutable set of questions. Order is the presentation and scoring order.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionBank {
    id: String,
    title: String,
    description: Option<String>,
    pass_threshold: Option<u8>,
    time_limit_secs: Option<u32>,
    exam_question_count: Option<usize>,
    categories: Vec<String>,
    questions: Vec<Question>,
    positions: HashMap<QuestionId, usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BankSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub pass_threshold: Option<u8>,
}

impl QuestionBank {
    pub fn new(id: &str, title: &str, questions: Vec<Question>) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::ConfigurationError(format!(
                "question bank '{}' has no questions",
                id
            )));
        }

        let mut positions = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if positions.insert(question.id().clone(), position).is_some() {
                return Err(AppError::ConfigurationError(format!(
                    "question id '{}' appears more than once in bank '{}'",
                    question.id(),
                    id
                )));
            }
        }

        Ok(QuestionBank {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            pass_threshold: None,
            time_limit_secs: None,
            exam_question_count: None,
            categories: Vec::new(),
            questions,
            positions,
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_pass_threshold(mut self, threshold: u8) -> AppResult<Self> {
        if threshold > 100 {
            return Err(AppError::ConfigurationError(format!(
                "pass threshold {} for bank '{}' is not a percentage",
                threshold, self.id
            )));
        }
        self.pass_threshold = Some(threshold);
        Ok(self)
    }

    pub fn with_time_limit_secs(mut self, secs: u32) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    pub fn with_exam_question_count(mut self, count: usize) -> Self {
        self.exam_question_count = Some(count);
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// A bank over a subset of this one's questions, keeping its metadata.
    pub fn derive(&self, questions: Vec<Question>) -> AppResult<Self> {
        let mut bank = QuestionBank::new(&self.id, &self.title, questions)?;
        bank.description = self.description.clone();
        bank.pass_threshold = self.pass_threshold;
        bank.time_limit_secs = self.time_limit_secs;
        bank.exam_question_count = self.exam_question_count;
        bank.categories = self.categories.clone();
        Ok(bank)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn pass_threshold(&self) -> Option<u8> {
        self.pass_threshold
    }

    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    pub fn exam_question_count(&self) -> Option<usize> {
        self.exam_question_count
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position_of(&self, id: &QuestionId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.position_of(id).map(|position| &self.questions[position])
    }

    pub fn question_at(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    pub fn summary(&self) -> BankSummary {
        BankSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            question_count: self.questions.len(),
            pass_threshold: self.pass_threshold,
        }
    }
}
