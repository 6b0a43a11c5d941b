use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::{Difficulty, Question, QuestionId};
use crate::models::domain::quiz_session::SessionStatus;
use crate::models::domain::score::{Score, Verdict};

/// What the reader sees after picking an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFeedback {
    pub question_id: QuestionId,
    pub selected_index: usize,
    pub is_correct: bool,
    pub correct_index: usize,
    pub explanation: String,
}

impl CheckFeedback {
    pub fn for_selection(question: &Question, selected_index: usize) -> Self {
        CheckFeedback {
            question_id: question.id().clone(),
            selected_index,
            is_correct: question.is_correct(selected_index),
            correct_index: question.correct_index(),
            explanation: question.explanation().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub position: usize,
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub selected_index: Option<usize>,
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<CheckFeedback>,
}

impl QuestionView {
    pub fn build(
        position: usize,
        question: &Question,
        selected_index: Option<usize>,
        flagged: bool,
    ) -> Self {
        QuestionView {
            position,
            id: question.id().clone(),
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            difficulty: question.difficulty(),
            category: question.category().map(str::to_string),
            selected_index,
            flagged,
            feedback: selected_index
                .map(|selected| CheckFeedback::for_selection(question, selected)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub score: Score,
    pub percentage: u8,
    pub pass_threshold: u8,
    pub verdict: Verdict,
}

impl ResultSummary {
    pub fn new(score: Score, pass_threshold: u8) -> Self {
        ResultSummary {
            score,
            percentage: score.percentage(),
            pass_threshold,
            verdict: score.verdict(pass_threshold),
        }
    }
}

/// Immutable render snapshot of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub bank_id: String,
    pub title: String,
    pub status: SessionStatus,
    pub closed: bool,
    pub current: usize,
    pub total: usize,
    pub stats: SessionStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSummary>,
    pub questions: Vec<QuestionView>,
    pub generated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn current_question(&self) -> Option<&QuestionView> {
        self.questions.get(self.current)
    }
}
