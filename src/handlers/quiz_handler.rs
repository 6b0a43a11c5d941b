use std::io::{BufRead, Write};

use serde::Serialize;

use crate::{
    app_state::AppState,
    cli::{CheckCommand, ExamCommand, ListCommand, QuizCommand, ReviewCommand},
    errors::AppResult,
    handlers::session_loop::{drive_inline_check, drive_session},
    models::domain::{QuestionId, QuizSession, Score},
    models::dto::question_dto::bank_file_schema,
    models::dto::response::ResultSummary,
    render,
    services::{
        quiz_service::ExamOptions,
        review_service::ReviewFilter,
        scoring_service::{GradedQuestion, ScoringService},
    },
};

#[derive(Debug, Serialize)]
struct GradedSheetResponse<'a> {
    bank_id: &'a str,
    result: ResultSummary,
    questions: Vec<GradedQuestion>,
}

pub fn list_banks<W: Write>(state: &AppState, cmd: &ListCommand, out: &mut W) -> AppResult<()> {
    let banks = state.quiz_service.list_banks()?;
    if cmd.json {
        serde_json::to_writer_pretty(&mut *out, &banks)?;
        writeln!(out)?;
        return Ok(());
    }
    render::bank_list(out, &banks)
}

pub fn check<R: BufRead, W: Write>(
    state: &AppState,
    cmd: &CheckCommand,
    input: &mut R,
    out: &mut W,
) -> AppResult<()> {
    let question_id = QuestionId::parse(&cmd.question);
    let check = state.quiz_service.start_inline_check(&cmd.bank, &question_id)?;
    drive_inline_check(check, input, out)?;
    Ok(())
}

pub fn quiz<R: BufRead, W: Write>(
    state: &AppState,
    cmd: &QuizCommand,
    input: &mut R,
    out: &mut W,
) -> AppResult<QuizSession> {
    let session = state.quiz_service.start_quiz(&cmd.bank)?;
    writeln!(out, "{}", session.title())?;
    drive_session(session, input, out)
}

pub fn exam<R: BufRead, W: Write>(
    state: &AppState,
    cmd: &ExamCommand,
    input: &mut R,
    out: &mut W,
) -> AppResult<QuizSession> {
    let options = ExamOptions {
        question_count: cmd.count,
        seed: cmd.seed,
        ..ExamOptions::default()
    };
    let session = state.quiz_service.start_mock_exam(&cmd.bank, options)?;
    writeln!(
        out,
        "{} - {} questions, pass mark {}%",
        session.title(),
        session.total(),
        session.pass_threshold()
    )?;
    drive_session(session, input, out)
}

/// Grade a whole answer sheet without the interactive loop. The filter limits
/// which questions are listed; the score always covers the whole sheet.
pub fn review<W: Write>(state: &AppState, cmd: &ReviewCommand, out: &mut W) -> AppResult<Score> {
    let sheet = cmd.answer_sheet()?;
    let bank = state.quiz_service.get_bank(&cmd.bank)?;
    let (score, graded) = ScoringService::grade_sheet(&bank, &sheet)?;

    let mut session = state.quiz_service.start_quiz(&cmd.bank)?;
    for (question, selected) in bank.questions().iter().zip(&sheet) {
        if let Some(selected) = selected {
            session.answer(question.id(), *selected)?;
        }
    }
    let positions = session.review(cmd.filter);
    let summary = ResultSummary::new(score, session.pass_threshold());

    if cmd.json {
        let response = GradedSheetResponse {
            bank_id: bank.id(),
            result: summary,
            questions: graded
                .into_iter()
                .filter(|graded| positions.contains(&graded.position))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &response)?;
        writeln!(out)?;
        return Ok(score);
    }

    render::graded_sheet(out, &bank, score, &graded)?;

    if cmd.filter != ReviewFilter::All {
        writeln!(out)?;
        render::review(out, &session.view(), &positions)?;
    }

    render::result(out, &summary)?;
    Ok(score)
}

pub fn schema<W: Write>(out: &mut W) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, &bank_file_schema())?;
    writeln!(out)?;
    Ok(())
}
