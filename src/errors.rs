use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Session closed: {0}")]
    SessionClosed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::InvalidSelection(_) => "INVALID_SELECTION",
            AppError::SessionClosed(_) => "SESSION_CLOSED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::IoError(_) => "IO_ERROR",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Errors caused by authored content rather than by the reader.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::ConfigurationError(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ConfigurationError(err.to_string())
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::ConfigurationError("test".into()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::InvalidSelection("test".into()).error_code(),
            "INVALID_SELECTION"
        );
        assert_eq!(
            AppError::SessionClosed("test".into()).error_code(),
            "SESSION_CLOSED"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("bank".into());
        assert_eq!(err.to_string(), "Not found: bank");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: AppError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_configuration());
    }
}
