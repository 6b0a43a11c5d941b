use serde::{Deserialize, Serialize};

use crate::models::domain::question::{Question, QuestionId};

/// The option a reader picked for one question. Correctness is always derived
/// from the question, never stored alongside.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerSelection {
    pub question_id: QuestionId,
    pub selected_index: usize,
}

impl AnswerSelection {
    pub fn new(question_id: QuestionId, selected_index: usize) -> Self {
        AnswerSelection {
            question_id,
            selected_index,
        }
    }

    pub fn is_correct(&self, question: &Question) -> bool {
        question.is_correct(self.selected_index)
    }
}

/// Whether a reader may change an answer once given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RevisionPolicy {
    #[default]
    Allow,
    Lock,
}

impl RevisionPolicy {
    pub fn from_flag(allow_revision: bool) -> Self {
        if allow_revision {
            RevisionPolicy::Allow
        } else {
            RevisionPolicy::Lock
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correctness_follows_the_question() {
        let question = Question::multiple_choice(4, "Prompt", &["A", "B", "C"], 2, "Because")
            .expect("question should be valid");

        assert!(AnswerSelection::new(QuestionId::Number(4), 2).is_correct(&question));
        assert!(!AnswerSelection::new(QuestionId::Number(4), 0).is_correct(&question));
    }

    #[test]
    fn revision_policy_from_flag() {
        assert_eq!(RevisionPolicy::from_flag(true), RevisionPolicy::Allow);
        assert_eq!(RevisionPolicy::from_flag(false), RevisionPolicy::Lock);
        assert_eq!(RevisionPolicy::default(), RevisionPolicy::Allow);
    }
}
