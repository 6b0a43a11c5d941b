use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::answer::{AnswerSelection, RevisionPolicy};
use crate::models::domain::question::{Question, QuestionId};
use crate::models::domain::question_bank::QuestionBank;
use crate::models::domain::score::{Score, Verdict};
use crate::models::dto::response::{
    CheckFeedback, QuestionView, ResultSummary, SessionStats, SessionView,
};
use crate::services::review_service::{ReviewFilter, ReviewService};
use crate::services::scoring_service::ScoringService;

pub const DEFAULT_PASS_THRESHOLD: u8 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Commands the presentation layer sends to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Answer {
        question_id: QuestionId,
        option_index: usize,
    },
    AnswerCurrent(usize),
    ToggleFlag(QuestionId),
    Next,
    Previous,
    GoTo(usize),
    NextFlagged,
    Submit,
    Reset,
}

/// A graded run through one question bank.
#[derive(Clone, Debug)]
pub struct QuizSession {
    id: String,
    bank: Arc<QuestionBank>,
    answers: HashMap<QuestionId, AnswerSelection>,
    flagged: HashSet<QuestionId>,
    current: usize,
    policy: RevisionPolicy,
    pass_threshold: u8,
    started_at: DateTime<Utc>,
    time_limit: Option<Duration>,
    submitted_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        let pass_threshold = bank.pass_threshold().unwrap_or(DEFAULT_PASS_THRESHOLD);
        let session = QuizSession {
            id: Uuid::new_v4().to_string(),
            bank,
            answers: HashMap::new(),
            flagged: HashSet::new(),
            current: 0,
            policy: RevisionPolicy::default(),
            pass_threshold,
            started_at: Utc::now(),
            time_limit: None,
            submitted_at: None,
        };
        log::info!(
            "Started quiz session {} on '{}' ({} questions)",
            session.id,
            session.bank.id(),
            session.bank.len()
        );
        session
    }

    /// Ad-hoc quiz over questions defined inline by a course page.
    pub fn from_questions(title: &str, questions: Vec<Question>) -> AppResult<Self> {
        let bank = QuestionBank::new("inline-quiz", title, questions)?;
        Ok(QuizSession::new(Arc::new(bank)))
    }

    pub fn with_policy(mut self, policy: RevisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pass_threshold(mut self, threshold: u8) -> AppResult<Self> {
        if threshold > 100 {
            return Err(AppError::ConfigurationError(format!(
                "pass threshold {} is not a percentage",
                threshold
            )));
        }
        self.pass_threshold = threshold;
        Ok(self)
    }

    pub fn with_time_limit(mut self, limit: Duration) -> AppResult<Self> {
        if limit <= Duration::zero() {
            return Err(AppError::ConfigurationError(
                "time limit must be positive".to_string(),
            ));
        }
        if Utc::now().checked_add_signed(limit).is_none() {
            return Err(AppError::ConfigurationError(format!(
                "time limit of {} minutes is out of range",
                limit.num_minutes()
            )));
        }
        self.time_limit = Some(limit);
        Ok(self)
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn title(&self) -> &str {
        self.bank.title()
    }

    pub fn pass_threshold(&self) -> u8 {
        self.pass_threshold
    }

    pub fn policy(&self) -> RevisionPolicy {
        self.policy
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.bank.questions()[self.current]
    }

    pub fn total(&self) -> usize {
        self.bank.len()
    }

    pub fn answers(&self) -> &HashMap<QuestionId, AnswerSelection> {
        &self.answers
    }

    pub fn selection_for(&self, question_id: &QuestionId) -> Option<usize> {
        self.answers.get(question_id).map(|a| a.selected_index)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.time_limit
            .and_then(|limit| self.started_at.checked_add_signed(limit))
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline()
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// When the session stopped accepting answers, if it has.
    pub fn closed_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.submitted_at.or_else(|| {
            self.deadline()
                .filter(|deadline| now >= *deadline)
        })
    }

    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        self.closed_at(now).is_some()
    }

    pub fn status(&self) -> SessionStatus {
        match self.answers.len() {
            0 => SessionStatus::NotStarted,
            n if n < self.bank.len() => SessionStatus::InProgress,
            _ => SessionStatus::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == SessionStatus::Completed
    }

    /// Recomputed from the current answers on every call.
    pub fn score(&self) -> Score {
        ScoringService::score(&self.bank, &self.answers)
    }

    pub fn verdict(&self) -> Verdict {
        self.score().verdict(self.pass_threshold)
    }

    pub fn answer(
        &mut self,
        question_id: &QuestionId,
        option_index: usize,
    ) -> AppResult<CheckFeedback> {
        self.answer_at(question_id, option_index, Utc::now())
    }

    pub fn answer_at(
        &mut self,
        question_id: &QuestionId,
        option_index: usize,
        now: DateTime<Utc>,
    ) -> AppResult<CheckFeedback> {
        self.ensure_open(now)?;

        let question = self.bank.get(question_id).ok_or_else(|| {
            AppError::InvalidSelection(format!(
                "question '{}' is not part of '{}'",
                question_id,
                self.bank.id()
            ))
        })?;
        question.check_option(option_index)?;

        if let (RevisionPolicy::Lock, Some(previous)) =
            (self.policy, self.answers.get(question_id))
        {
            if previous.selected_index != option_index {
                return Err(AppError::InvalidSelection(format!(
                    "question '{}' is already answered",
                    question_id
                )));
            }
        }

        let feedback = CheckFeedback::for_selection(question, option_index);
        self.answers.insert(
            question_id.clone(),
            AnswerSelection::new(question_id.clone(), option_index),
        );
        log::debug!(
            "Session {} answered '{}' with option {} ({})",
            self.id,
            question_id,
            option_index,
            if feedback.is_correct { "correct" } else { "incorrect" }
        );

        Ok(feedback)
    }

    pub fn answer_current(&mut self, option_index: usize) -> AppResult<CheckFeedback> {
        let question_id = self.current_question().id().clone();
        self.answer(&question_id, option_index)
    }

    pub fn feedback_for(&self, question_id: &QuestionId) -> Option<CheckFeedback> {
        let question = self.bank.get(question_id)?;
        self.selection_for(question_id)
            .map(|selected| CheckFeedback::for_selection(question, selected))
    }

    /// Returns whether the question is flagged afterwards.
    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> AppResult<bool> {
        if self.bank.get(question_id).is_none() {
            return Err(AppError::InvalidSelection(format!(
                "cannot flag unknown question '{}'",
                question_id
            )));
        }

        if self.flagged.remove(question_id) {
            Ok(false)
        } else {
            self.flagged.insert(question_id.clone());
            Ok(true)
        }
    }

    pub fn is_flagged(&self, question_id: &QuestionId) -> bool {
        self.flagged.contains(question_id)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    /// Flagged question positions in bank order.
    pub fn flagged_positions(&self) -> Vec<usize> {
        self.bank
            .questions()
            .iter()
            .enumerate()
            .filter(|(_, q)| self.flagged.contains(q.id()))
            .map(|(position, _)| position)
            .collect()
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.bank.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn go_to(&mut self, position: usize) -> AppResult<()> {
        if position >= self.bank.len() {
            return Err(AppError::InvalidSelection(format!(
                "position {} is past the last question ({})",
                position,
                self.bank.len()
            )));
        }
        self.current = position;
        Ok(())
    }

    /// Moves to the next flagged question after the cursor, wrapping to the first.
    pub fn next_flagged(&mut self) -> Option<usize> {
        let flagged = self.flagged_positions();
        let target = flagged
            .iter()
            .copied()
            .find(|&position| position > self.current)
            .or_else(|| flagged.first().copied())?;
        self.current = target;
        Some(target)
    }

    pub fn submit(&mut self) -> Score {
        self.submit_at(Utc::now())
    }

    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Score {
        if self.submitted_at.is_none() {
            let closed_at = self.closed_at(now).unwrap_or(now);
            self.submitted_at = Some(closed_at);
            log::info!(
                "Session {} submitted with score {}",
                self.id,
                self.score()
            );
        }
        self.score()
    }

    /// Closes the session at its deadline if the time limit has passed.
    pub fn submit_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self.submitted_at.is_none() && self.is_expired_at(now) {
            self.submit_at(now);
            return true;
        }
        false
    }

    /// Clears every answer, flag and the submission in one step.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.flagged.clear();
        self.current = 0;
        self.submitted_at = None;
        self.started_at = Utc::now();
        log::info!("Session {} reset", self.id);
    }

    pub fn apply(&mut self, command: SessionCommand) -> AppResult<()> {
        match command {
            SessionCommand::Answer {
                question_id,
                option_index,
            } => self.answer(&question_id, option_index).map(|_| ()),
            SessionCommand::AnswerCurrent(option_index) => {
                self.answer_current(option_index).map(|_| ())
            }
            SessionCommand::ToggleFlag(question_id) => self.toggle_flag(&question_id).map(|_| ()),
            SessionCommand::Next => {
                self.next();
                Ok(())
            }
            SessionCommand::Previous => {
                self.previous();
                Ok(())
            }
            SessionCommand::GoTo(position) => self.go_to(position),
            SessionCommand::NextFlagged => {
                self.next_flagged();
                Ok(())
            }
            SessionCommand::Submit => {
                self.submit();
                Ok(())
            }
            SessionCommand::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Returns the session that results from `command`, leaving `self` as it was.
    pub fn dispatch(&self, command: SessionCommand) -> AppResult<QuizSession> {
        let mut next = self.clone();
        next.apply(command)?;
        Ok(next)
    }

    pub fn review(&self, filter: ReviewFilter) -> Vec<usize> {
        ReviewService::filter(self, filter)
    }

    pub fn stats(&self) -> SessionStats {
        ReviewService::stats(self)
    }

    pub fn view(&self) -> SessionView {
        self.view_at(Utc::now())
    }

    pub fn view_at(&self, now: DateTime<Utc>) -> SessionView {
        let closed = self.is_closed_at(now);
        let result = if closed || self.is_completed() {
            Some(ResultSummary::new(self.score(), self.pass_threshold))
        } else {
            None
        };

        let questions = self
            .bank
            .questions()
            .iter()
            .enumerate()
            .map(|(position, question)| {
                QuestionView::build(
                    position,
                    question,
                    self.selection_for(question.id()),
                    self.is_flagged(question.id()),
                )
            })
            .collect();

        SessionView {
            session_id: self.id.clone(),
            bank_id: self.bank.id().to_string(),
            title: self.bank.title().to_string(),
            status: self.status(),
            closed,
            current: self.current,
            total: self.bank.len(),
            stats: self.stats(),
            remaining_secs: self.remaining_at(now).map(|d| d.num_seconds()),
            result,
            questions,
            generated_at: now,
        }
    }

    fn ensure_open(&self, now: DateTime<Utc>) -> AppResult<()> {
        match self.closed_at(now) {
            Some(closed_at) => Err(AppError::SessionClosed(format!(
                "session {} closed at {}",
                self.id,
                closed_at.to_rfc3339()
            ))),
            None => Ok(()),
        }
    }
}
