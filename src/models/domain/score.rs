use std::fmt;

use serde::{Deserialize, Serialize};

/// Points below the pass threshold that still count as a near miss.
pub const MARGINAL_BAND: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Verdict {
    Pass,
    Marginal,
    Fail,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        Score { correct, total }
    }

    /// Whole-number percentage, rounding halves up.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct * 200 + self.total) / (self.total * 2)) as u8
    }

    pub fn verdict(&self, pass_threshold: u8) -> Verdict {
        let percentage = self.percentage();
        if percentage >= pass_threshold {
            Verdict::Pass
        } else if percentage >= pass_threshold.saturating_sub(MARGINAL_BAND) {
            Verdict::Marginal
        } else {
            Verdict::Fail
        }
    }

    pub fn passed(&self, pass_threshold: u8) -> bool {
        self.verdict(pass_threshold) == Verdict::Pass
    }
}

impl From<Score> for (usize, usize) {
    fn from(score: Score) -> Self {
        (score.correct, score.total)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.correct, self.total, self.percentage())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Pass => "Pass",
            Verdict::Marginal => "Marginal",
            Verdict::Fail => "Fail",
        };
        f.write_str(label)
    }
}
