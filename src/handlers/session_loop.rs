use std::io::{BufRead, Write};

use chrono::Utc;

use crate::errors::AppResult;
use crate::models::domain::{InlineCheck, QuizSession, SessionCommand};
use crate::render;
use crate::services::review_service::ReviewFilter;

const HELP: &str = "Enter an option number to answer, n next, p previous, f flag, \
g next flagged, s submit, r restart, q quit.";

/// One line of reader input, interpreted against the current session.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Command(SessionCommand),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_action(line: &str, session: &QuizSession) -> Action {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return match n.checked_sub(1) {
            Some(index) => Action::Command(SessionCommand::AnswerCurrent(index)),
            None => Action::Unknown(line.to_string()),
        };
    }

    match line.to_ascii_lowercase().as_str() {
        "n" | "" => Action::Command(SessionCommand::Next),
        "p" => Action::Command(SessionCommand::Previous),
        "f" => Action::Command(SessionCommand::ToggleFlag(
            session.current_question().id().clone(),
        )),
        "g" => Action::Command(SessionCommand::NextFlagged),
        "s" => Action::Command(SessionCommand::Submit),
        "r" => Action::Command(SessionCommand::Reset),
        "q" => Action::Quit,
        "?" | "h" => Action::Help,
        other => Action::Unknown(other.to_string()),
    }
}

/// Run a session until it is submitted, times out, or input ends.
pub fn drive_session<R: BufRead, W: Write>(
    mut session: QuizSession,
    input: &mut R,
    out: &mut W,
) -> AppResult<QuizSession> {
    let mut line = String::new();
    writeln!(out, "{}", HELP)?;

    loop {
        let now = Utc::now();
        if session.submit_if_expired(now) {
            writeln!(out, "Time is up.")?;
        }

        let view = session.view_at(now);
        if view.closed {
            if let Some(result) = &view.result {
                render::result(out, result)?;
            }
            let missed = session.review(ReviewFilter::Incorrect);
            if !missed.is_empty() {
                writeln!(out, "Review your incorrect answers:")?;
                render::review(out, &view, &missed)?;
            }
            return Ok(session);
        }

        render::session_header(out, &view)?;
        if let Some(question) = view.current_question() {
            render::question(out, question, view.current + 1, view.total)?;
        }
        if let Some(result) = &view.result {
            render::result(out, result)?;
            writeln!(out, "All questions answered. Enter s to submit or r to start again.")?;
        }

        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            log::debug!("Input closed, leaving session {}", session.id());
            return Ok(session);
        }

        match parse_action(&line, &session) {
            Action::Quit => return Ok(session),
            Action::Help => writeln!(out, "{}", HELP)?,
            Action::Unknown(text) => {
                writeln!(out, "Unknown command '{}'. Enter ? for help.", text)?
            }
            Action::Command(command) => {
                let answering = matches!(command, SessionCommand::AnswerCurrent(_));
                let question_id = session.current_question().id().clone();

                match session.dispatch(command) {
                    Ok(next) => {
                        session = next;
                        if answering {
                            if let Some(feedback) = session.feedback_for(&question_id) {
                                let options = session.current_question().options();
                                render::feedback(out, &feedback, options)?;
                            }
                            session.next();
                        }
                    }
                    Err(err) => writeln!(out, "! {}", err)?,
                }
            }
        }
        writeln!(out)?;
    }
}

/// Ask one question until a valid option is picked or input ends.
pub fn drive_inline_check<R: BufRead, W: Write>(
    mut check: InlineCheck,
    input: &mut R,
    out: &mut W,
) -> AppResult<InlineCheck> {
    let mut line = String::new();
    render::question(out, &check.view(), 1, 1)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(check);
        }

        let entry = line.trim();
        if entry.eq_ignore_ascii_case("q") {
            return Ok(check);
        }

        let selection = entry.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
        let Some(index) = selection else {
            writeln!(
                out,
                "Enter an option number between 1 and {}.",
                check.question().option_count()
            )?;
            continue;
        };

        match check.select(index) {
            Ok(feedback) => {
                render::feedback(out, &feedback, check.question().options())?;
                return Ok(check);
            }
            Err(err) => writeln!(out, "! {}", err)?,
        }
    }
}
