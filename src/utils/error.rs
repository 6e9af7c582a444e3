// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Workbook not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unreadable workbook: {0}")]
    Unreadable(String),

    #[error("Workbook contains no readable sheets")]
    NoSheets,

    #[error("Validation failed: {}", .errors.join("; "))]
    Validation {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Loading workbook failed: {0}")]
    Source(#[from] SourceError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_error() {
        let err = ParseError::Validation {
            errors: vec!["first".to_string(), "second".to_string()],
            warnings: vec!["ignored".to_string()],
        };
        assert_eq!(err.to_string(), "Validation failed: first; second");
    }

    #[test]
    fn parse_error_converts_into_app_error() {
        let app: AppError = ParseError::NoSheets.into();
        assert!(matches!(app, AppError::Parse(ParseError::NoSheets)));
        assert!(app.to_string().contains("no readable sheets"));
    }
}
