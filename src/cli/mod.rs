//! Command-line interface for the study centre.

mod commands;

use clap::{Parser, Subcommand};
use log::LevelFilter;

pub use commands::{CheckCommand, ExamCommand, ListCommand, QuizCommand, ReviewCommand};

/// study-centre - Knowledge checks and mock exams for electrical apprentices
#[derive(Debug, Parser)]
#[command(name = "study-centre")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available question banks
    List(ListCommand),

    /// Answer a single knowledge-check question
    Check(CheckCommand),

    /// Work through a whole question bank as a graded quiz
    Quiz(QuizCommand),

    /// Sit a timed mock exam drawn at random from a bank
    Exam(ExamCommand),

    /// Grade a full answer sheet against a bank
    Review(ReviewCommand),

    /// Print the JSON Schema for question bank files
    Schema,
}

impl Cli {
    /// Log level implied by the verbosity flags. `RUST_LOG` still wins.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}
