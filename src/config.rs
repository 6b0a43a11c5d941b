use std::env;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// Longest mock exam the configuration may ask for.
pub const MAX_EXAM_TIME_LIMIT_MINS: i64 = 24 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub bank_dir: Option<PathBuf>,
    pub default_pass_threshold: u8,
    pub exam_question_count: usize,
    pub exam_time_limit_mins: i64,
    pub allow_revision: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bank_dir: env::var("STUDY_CENTRE_BANK_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            default_pass_threshold: env::var("STUDY_CENTRE_PASS_THRESHOLD")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(70),
            exam_question_count: env::var("STUDY_CENTRE_EXAM_QUESTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(30),
            exam_time_limit_mins: env::var("STUDY_CENTRE_EXAM_TIME_LIMIT_MINS")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(45),
            allow_revision: env::var("STUDY_CENTRE_ALLOW_REVISION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Reject settings that would make every quiz meaningless
    pub fn validate(&self) -> AppResult<()> {
        if self.default_pass_threshold > 100 {
            return Err(AppError::ConfigurationError(format!(
                "STUDY_CENTRE_PASS_THRESHOLD must be a percentage, got {}",
                self.default_pass_threshold
            )));
        }

        if self.exam_question_count == 0 {
            return Err(AppError::ConfigurationError(
                "STUDY_CENTRE_EXAM_QUESTIONS must be at least 1".to_string(),
            ));
        }

        if self.exam_time_limit_mins <= 0 {
            return Err(AppError::ConfigurationError(format!(
                "STUDY_CENTRE_EXAM_TIME_LIMIT_MINS must be positive, got {}",
                self.exam_time_limit_mins
            )));
        }

        if self.exam_time_limit_mins > MAX_EXAM_TIME_LIMIT_MINS {
            return Err(AppError::ConfigurationError(format!(
                "STUDY_CENTRE_EXAM_TIME_LIMIT_MINS must be at most {}, got {}",
                MAX_EXAM_TIME_LIMIT_MINS, self.exam_time_limit_mins
            )));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            bank_dir: None,
            default_pass_threshold: 70,
            exam_question_count: 10,
            exam_time_limit_mins: 30,
            allow_revision: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(config.default_pass_threshold <= 100 || config.validate().is_err());
        assert!(config.exam_question_count > 0 || config.validate().is_err());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert!(config.bank_dir.is_none());
        assert_eq!(config.default_pass_threshold, 70);
        assert!(config.allow_revision);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_threshold_over_100() {
        let config = Config {
            default_pass_threshold: 101,
            ..Config::test_config()
        };

        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rejects_empty_exam() {
        let config = Config {
            exam_question_count: 0,
            ..Config::test_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_time_limit() {
        let config = Config {
            exam_time_limit_mins: 0,
            ..Config::test_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_time_limit_over_a_day() {
        let config = Config {
            exam_time_limit_mins: 1_000_000_000_000,
            ..Config::test_config()
        };

        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());

        let longest = Config {
            exam_time_limit_mins: MAX_EXAM_TIME_LIMIT_MINS,
            ..Config::test_config()
        };
        assert!(longest.validate().is_ok());
    }
}
