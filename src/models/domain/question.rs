use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::dto::question_dto::QuestionInput;

/// Course pages use integer ids for end-of-section quizzes and slugs for inline checks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        QuestionId::Text(s)
    }
}

impl QuestionId {
    /// Parse user input, preferring the numeric form when the text is all digits.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<u64>()
            .map(QuestionId::Number)
            .unwrap_or_else(|_| QuestionId::Text(raw.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// A single multiple-choice item. Only constructible through validation, so
/// `correct_index` always points into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "QuestionInput", into = "QuestionInput")]
pub struct Question {
    pub(crate) id: QuestionId,
    pub(crate) prompt: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_index: usize,
    pub(crate) explanation: String,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) category: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) topic: Option<String>,
}

impl Question {
    pub fn multiple_choice(
        id: impl Into<QuestionId>,
        prompt: &str,
        options: &[&str],
        correct_index: usize,
        explanation: &str,
    ) -> AppResult<Self> {
        Question::try_from(QuestionInput {
            id: id.into(),
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            explanation: explanation.to_string(),
            difficulty: None,
            category: None,
            section: None,
            topic: None,
        })
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    /// Reject an option index that the reader could never have been offered.
    pub fn check_option(&self, option_index: usize) -> AppResult<()> {
        if option_index >= self.options.len() {
            return Err(AppError::InvalidSelection(format!(
                "option {} is out of range for question '{}' ({} options)",
                option_index,
                self.id,
                self.options.len()
            )));
        }
        Ok(())
    }
}
