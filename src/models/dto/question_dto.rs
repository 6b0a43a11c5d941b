use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::domain::question::{Difficulty, Question, QuestionId};
use crate::models::domain::QuestionBank;

static TEXT_ID_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$")
        .expect("TEXT_ID_REGEX is a valid regex pattern")
});

static BANK_ID_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("BANK_ID_REGEX is a valid regex pattern")
});

/// One question as authored in a bank file.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_correct_index"))]
pub struct QuestionInput {
    #[validate(custom(function = "validate_question_id"))]
    pub id: QuestionId,

    #[serde(rename = "question", alias = "prompt")]
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub prompt: String,

    #[validate(length(min = 2, message = "a question needs at least two options"))]
    pub options: Vec<String>,

    #[serde(rename = "correctAnswer", alias = "correctIndex")]
    pub correct_index: usize,

    #[validate(length(min = 1, message = "explanation must not be empty"))]
    pub explanation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

fn validate_question_id(id: &QuestionId) -> Result<(), ValidationError> {
    match id {
        QuestionId::Number(_) => Ok(()),
        QuestionId::Text(text) if TEXT_ID_REGEX.is_match(text) => Ok(()),
        QuestionId::Text(text) => Err(ValidationError::new("question_id").with_message(
            Cow::Owned(format!("'{}' is not a valid question id", text)),
        )),
    }
}

fn validate_correct_index(input: &QuestionInput) -> Result<(), ValidationError> {
    if input.correct_index >= input.options.len() {
        return Err(ValidationError::new("correct_index").with_message(Cow::Owned(format!(
            "correct answer {} is out of range for question '{}' with {} options",
            input.correct_index,
            input.id,
            input.options.len()
        ))));
    }
    Ok(())
}

impl TryFrom<QuestionInput> for Question {
    type Error = AppError;

    fn try_from(dto: QuestionInput) -> Result<Self, Self::Error> {
        dto.validate()?;

        Ok(Question {
            id: dto.id,
            prompt: dto.prompt,
            options: dto.options,
            correct_index: dto.correct_index,
            explanation: dto.explanation,
            difficulty: dto.difficulty,
            category: dto.category,
            section: dto.section,
            topic: dto.topic,
        })
    }
}

impl From<Question> for QuestionInput {
    fn from(question: Question) -> Self {
        QuestionInput {
            id: question.id,
            prompt: question.prompt,
            options: question.options,
            correct_index: question.correct_index,
            explanation: question.explanation,
            difficulty: question.difficulty,
            category: question.category,
            section: question.section,
            topic: question.topic,
        }
    }
}

/// On-disk question bank, one per JSON file.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBankFile {
    #[validate(custom(function = "validate_bank_id"))]
    pub id: String,

    #[validate(length(min = 1, message = "bank title must not be empty"))]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 100, message = "pass threshold is a percentage"))]
    pub pass_threshold: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub time_limit_secs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub exam_question_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[validate(
        length(min = 1, message = "a question bank needs at least one question"),
        nested
    )]
    pub questions: Vec<QuestionInput>,
}

fn validate_bank_id(id: &str) -> Result<(), ValidationError> {
    if BANK_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(ValidationError::new("bank_id")
            .with_message(Cow::Owned(format!("'{}' is not a valid bank id", id))))
    }
}

impl TryFrom<QuestionBankFile> for QuestionBank {
    type Error = AppError;

    fn try_from(dto: QuestionBankFile) -> Result<Self, Self::Error> {
        dto.validate()?;

        let questions = dto
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, AppError>>()?;

        let mut seen = HashSet::new();
        for category in &dto.categories {
            if !seen.insert(category.as_str()) {
                return Err(AppError::ConfigurationError(format!(
                    "category '{}' is listed twice in bank '{}'",
                    category, dto.id
                )));
            }
        }

        let mut bank = QuestionBank::new(&dto.id, &dto.title, questions)?
            .with_categories(dto.categories);
        if let Some(description) = dto.description {
            bank = bank.with_description(&description);
        }
        if let Some(threshold) = dto.pass_threshold {
            bank = bank.with_pass_threshold(threshold)?;
        }
        if let Some(secs) = dto.time_limit_secs {
            bank = bank.with_time_limit_secs(secs);
        }
        if let Some(count) = dto.exam_question_count {
            bank = bank.with_exam_question_count(count);
        }

        Ok(bank)
    }
}

impl From<&QuestionBank> for QuestionBankFile {
    fn from(bank: &QuestionBank) -> Self {
        QuestionBankFile {
            id: bank.id().to_string(),
            title: bank.title().to_string(),
            description: bank.description().map(str::to_string),
            pass_threshold: bank.pass_threshold(),
            time_limit_secs: bank.time_limit_secs(),
            exam_question_count: bank.exam_question_count(),
            categories: bank.categories().to_vec(),
            questions: bank
                .questions()
                .iter()
                .cloned()
                .map(QuestionInput::from)
                .collect(),
        }
    }
}

/// JSON Schema describing the bank file format.
pub fn bank_file_schema() -> schemars::Schema {
    schemars::schema_for!(QuestionBankFile)
}
