//! Plain-text presentation of checks, quiz questions and results.
//!
//! Everything here consumes the serialisable snapshots from
//! [`crate::models::dto::response`] and writes to any [`Write`], so the same
//! output can go to a terminal or a buffer under test.

use std::io::Write;

use crate::errors::AppResult;
use crate::models::domain::{BankSummary, QuestionBank, Score};
use crate::models::dto::response::{CheckFeedback, QuestionView, ResultSummary, SessionView};
use crate::services::scoring_service::GradedQuestion;

const CORRECT_MARK: &str = "✓";
const INCORRECT_MARK: &str = "✗";

pub fn bank_list<W: Write>(out: &mut W, banks: &[BankSummary]) -> AppResult<()> {
    if banks.is_empty() {
        writeln!(out, "No question banks available.")?;
        return Ok(());
    }

    for bank in banks {
        let threshold = bank
            .pass_threshold
            .map(|t| format!(", pass {}%", t))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<36} {} ({} questions{})",
            bank.id, bank.title, bank.question_count, threshold
        )?;
    }
    Ok(())
}

/// Prompt and numbered options, with the reader's pick marked once answered.
pub fn question<W: Write>(
    out: &mut W,
    view: &QuestionView,
    number: usize,
    total: usize,
) -> AppResult<()> {
    let flag = if view.flagged { " [flagged]" } else { "" };
    writeln!(out, "Question {} of {}{}", number, total, flag)?;
    if let Some(difficulty) = view.difficulty {
        match &view.category {
            Some(category) => writeln!(out, "{} • {}", category, difficulty)?,
            None => writeln!(out, "{}", difficulty)?,
        }
    }
    writeln!(out, "{}", view.prompt)?;

    for (index, option) in view.options.iter().enumerate() {
        let marker = match &view.feedback {
            Some(feedback) if index == feedback.correct_index => CORRECT_MARK,
            Some(feedback) if index == feedback.selected_index => INCORRECT_MARK,
            _ => " ",
        };
        let chosen = if view.selected_index == Some(index) { ">" } else { " " };
        writeln!(out, "{}{} {}. {}", chosen, marker, index + 1, option)?;
    }
    Ok(())
}

pub fn feedback<W: Write>(
    out: &mut W,
    feedback: &CheckFeedback,
    options: &[String],
) -> AppResult<()> {
    if feedback.is_correct {
        writeln!(out, "{} Correct.", CORRECT_MARK)?;
    } else {
        let answer = options
            .get(feedback.correct_index)
            .map(String::as_str)
            .unwrap_or_default();
        writeln!(
            out,
            "{} Incorrect. The answer is {}. {}",
            INCORRECT_MARK,
            feedback.correct_index + 1,
            answer
        )?;
    }
    writeln!(out, "{}", feedback.explanation)?;
    Ok(())
}

pub fn session_header<W: Write>(out: &mut W, view: &SessionView) -> AppResult<()> {
    write!(
        out,
        "{} | answered {}/{} | flagged {}",
        view.title, view.stats.answered, view.total, view.stats.flagged
    )?;
    if let Some(secs) = view.remaining_secs {
        write!(out, " | {}", format_time(secs))?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn result<W: Write>(out: &mut W, result: &ResultSummary) -> AppResult<()> {
    writeln!(
        out,
        "Score: {} - {} (pass mark {}%)",
        result.score, result.verdict, result.pass_threshold
    )?;
    Ok(())
}

/// Every question at `positions` with the reader's answer and the explanation.
pub fn review<W: Write>(out: &mut W, view: &SessionView, positions: &[usize]) -> AppResult<()> {
    if positions.is_empty() {
        writeln!(out, "No questions match the selected filter.")?;
        return Ok(());
    }

    for &position in positions {
        let Some(question_view) = view.questions.get(position) else {
            continue;
        };
        question(out, question_view, position + 1, view.total)?;
        match &question_view.feedback {
            Some(fb) => writeln!(out, "{}", fb.explanation)?,
            None => writeln!(out, "Not answered.")?,
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn graded_sheet<W: Write>(
    out: &mut W,
    bank: &QuestionBank,
    score: Score,
    results: &[GradedQuestion],
) -> AppResult<()> {
    for graded in results {
        let mark = match graded.selected_index {
            None => "-",
            Some(_) if graded.is_correct => CORRECT_MARK,
            Some(_) => INCORRECT_MARK,
        };
        let prompt = bank
            .question_at(graded.position)
            .map(|q| q.prompt())
            .unwrap_or_default();
        writeln!(out, "{} {:>3}. {}", mark, graded.position + 1, prompt)?;
    }
    writeln!(out, "Score: {}", score)?;
    Ok(())
}

pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::Question;
    use crate::models::domain::score::Verdict;

    fn to_string<F: FnOnce(&mut Vec<u8>) -> AppResult<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("rendering should succeed");
        String::from_utf8(buf).expect("output should be utf-8")
    }

    fn sample() -> Question {
        Question::multiple_choice(
            1,
            "What does PPE stand for?",
            &["Personal Protective Equipment", "Public Power Entry"],
            0,
            "PPE protects the wearer.",
        )
        .expect("question should be valid")
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(125), "2:05");
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(-3), "0:00");
    }

    #[test]
    fn unanswered_question_has_no_marks() {
        let view = QuestionView::build(0, &sample(), None, false);

        let text = to_string(|out| question(out, &view, 1, 1));

        assert!(text.contains("Question 1 of 1"));
        assert!(text.contains("1. Personal Protective Equipment"));
        assert!(!text.contains(CORRECT_MARK));
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let view = QuestionView::build(0, &sample(), Some(1), true);

        let text = to_string(|out| question(out, &view, 1, 1));

        assert!(text.contains("[flagged]"));
        assert!(text.contains(&format!(" {} 1.", CORRECT_MARK)));
        assert!(text.contains(&format!(">{} 2.", INCORRECT_MARK)));
    }

    #[test]
    fn feedback_names_the_right_answer() {
        let q = sample();
        let fb = CheckFeedback::for_selection(&q, 1);

        let text = to_string(|out| feedback(out, &fb, q.options()));

        assert!(text.contains("Incorrect. The answer is 1. Personal Protective Equipment"));
        assert!(text.contains("PPE protects the wearer."));
    }

    #[test]
    fn result_line_shows_verdict() {
        let summary = ResultSummary::new(Score::new(6, 10), 70);

        let text = to_string(|out| result(out, &summary));

        assert_eq!(summary.verdict, Verdict::Marginal);
        assert!(text.contains("6/10 (60%) - Marginal (pass mark 70%)"));
    }

    #[test]
    fn empty_bank_list_says_so() {
        let text = to_string(|out| bank_list(out, &[]));

        assert!(text.contains("No question banks"));
    }
}
