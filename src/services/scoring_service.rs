use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::domain::answer::AnswerSelection;
use crate::models::domain::question::QuestionId;
use crate::models::domain::{QuestionBank, Score};

/// Outcome for one question on a graded answer sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GradedQuestion {
    pub position: usize,
    pub question_id: QuestionId,
    pub selected_index: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

pub struct ScoringService;

impl ScoringService {
    /// Count answers matching their question's correct option, in bank order.
    pub fn score(bank: &QuestionBank, answers: &HashMap<QuestionId, AnswerSelection>) -> Score {
        let correct = bank
            .questions()
            .iter()
            .filter(|question| {
                answers
                    .get(question.id())
                    .is_some_and(|answer| answer.is_correct(question))
            })
            .count();

        Score::new(correct, bank.len())
    }

    /// Grade a whole answer sheet at once. `sheet[i]` is the option chosen for the
    /// question at position `i`, `None` when left blank.
    pub fn grade_sheet(
        bank: &QuestionBank,
        sheet: &[Option<usize>],
    ) -> AppResult<(Score, Vec<GradedQuestion>)> {
        if sheet.len() > bank.len() {
            return Err(AppError::InvalidSelection(format!(
                "answer sheet has {} entries but '{}' has {} questions",
                sheet.len(),
                bank.id(),
                bank.len()
            )));
        }

        let mut results = Vec::with_capacity(bank.len());
        let mut correct = 0;

        for (position, question) in bank.questions().iter().enumerate() {
            let selected_index = sheet.get(position).copied().flatten();
            if let Some(selected) = selected_index {
                question.check_option(selected)?;
            }

            let is_correct = selected_index.is_some_and(|selected| question.is_correct(selected));
            if is_correct {
                correct += 1;
            }

            results.push(GradedQuestion {
                position,
                question_id: question.id().clone(),
                selected_index,
                correct_index: question.correct_index(),
                is_correct,
            });
        }

        Ok((Score::new(correct, bank.len()), results))
    }
}
