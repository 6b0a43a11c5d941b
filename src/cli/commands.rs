//! CLI command definitions.

use clap::Args;

use crate::errors::{AppError, AppResult};
use crate::services::review_service::ReviewFilter;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Single knowledge-check arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Question bank id
    pub bank: String,

    /// Question id within the bank (number or slug)
    pub question: String,
}

/// Quiz arguments.
#[derive(Debug, Args)]
pub struct QuizCommand {
    /// Question bank id
    pub bank: String,
}

/// Mock exam arguments.
#[derive(Debug, Args)]
pub struct ExamCommand {
    /// Question bank id
    pub bank: String,

    /// Number of questions to draw
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Seed for a repeatable draw
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Answer-sheet grading arguments.
#[derive(Debug, Args)]
pub struct ReviewCommand {
    /// Question bank id
    pub bank: String,

    /// Comma-separated option numbers in bank order; leave an entry blank to skip it
    #[arg(short, long)]
    pub answers: String,

    /// Only list questions matching this filter
    #[arg(short, long, value_enum, default_value_t = ReviewFilter::All)]
    pub filter: ReviewFilter,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ReviewCommand {
    /// Option numbers are 1-based on the command line.
    pub fn answer_sheet(&self) -> AppResult<Vec<Option<usize>>> {
        parse_answer_sheet(&self.answers)
    }
}

pub fn parse_answer_sheet(raw: &str) -> AppResult<Vec<Option<usize>>> {
    raw.split(',')
        .map(str::trim)
        .map(|entry| {
            if entry.is_empty() {
                return Ok(None);
            }
            match entry.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Some(n - 1)),
                _ => Err(AppError::InvalidSelection(format!(
                    "'{}' is not an option number",
                    entry
                ))),
            }
        })
        .collect()
}
