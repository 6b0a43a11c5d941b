use crate::errors::{AppError, AppResult};
use crate::models::domain::answer::RevisionPolicy;
use crate::models::domain::question::Question;
use crate::models::dto::question_dto::QuestionInput;
use crate::models::dto::response::{CheckFeedback, QuestionView};

/// A single question embedded in course prose. Feedback and the explanation are
/// revealed as soon as an option is picked.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineCheck {
    question: Question,
    selection: Option<usize>,
    policy: RevisionPolicy,
}

impl InlineCheck {
    pub fn new(question: Question) -> Self {
        InlineCheck {
            question,
            selection: None,
            policy: RevisionPolicy::default(),
        }
    }

    /// Build straight from authored content, failing on malformed input.
    pub fn from_input(input: QuestionInput) -> AppResult<Self> {
        Ok(InlineCheck::new(Question::try_from(input)?))
    }

    pub fn with_policy(mut self, policy: RevisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn is_answered(&self) -> bool {
        self.selection.is_some()
    }

    pub fn select(&mut self, option_index: usize) -> AppResult<CheckFeedback> {
        if let Err(err) = self.question.check_option(option_index) {
            log::warn!("Rejected inline check selection: {}", err);
            return Err(err);
        }

        if let (RevisionPolicy::Lock, Some(previous)) = (self.policy, self.selection) {
            if previous != option_index {
                return Err(AppError::InvalidSelection(format!(
                    "question '{}' is already answered",
                    self.question.id()
                )));
            }
        }

        self.selection = Some(option_index);
        log::debug!(
            "Inline check '{}' answered with option {}",
            self.question.id(),
            option_index
        );

        Ok(CheckFeedback::for_selection(&self.question, option_index))
    }

    pub fn feedback(&self) -> Option<CheckFeedback> {
        self.selection
            .map(|selected| CheckFeedback::for_selection(&self.question, selected))
    }

    pub fn reset(&mut self) {
        self.selection = None;
    }

    pub fn view(&self) -> QuestionView {
        QuestionView::build(0, &self.question, self.selection, false)
    }
}
