use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::domain::QuizSession;
use crate::models::dto::response::SessionStats;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
    Flagged,
}

pub struct ReviewService;

impl ReviewService {
    /// Positions matching `filter`, in bank order.
    pub fn filter(session: &QuizSession, filter: ReviewFilter) -> Vec<usize> {
        session
            .bank()
            .questions()
            .iter()
            .enumerate()
            .filter(|(_, question)| {
                let selection = session.selection_for(question.id());
                match filter {
                    ReviewFilter::All => true,
                    ReviewFilter::Correct => selection.is_some_and(|s| question.is_correct(s)),
                    ReviewFilter::Incorrect => selection.is_some_and(|s| !question.is_correct(s)),
                    ReviewFilter::Unanswered => selection.is_none(),
                    ReviewFilter::Flagged => session.is_flagged(question.id()),
                }
            })
            .map(|(position, _)| position)
            .collect()
    }

    pub fn stats(session: &QuizSession) -> SessionStats {
        let answered = session.answered_count();
        SessionStats {
            answered,
            unanswered: session.total() - answered,
            flagged: session.flagged_count(),
        }
    }
}
