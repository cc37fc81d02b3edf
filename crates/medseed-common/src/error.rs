//! Error types for medseed

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for medseed operations
pub type Result<T> = std::result::Result<T, SeedError>;

/// Process exit status reported by the `medseed` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    ConfigError = 1,
    InputError = 2,
    DatabaseError = 3,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Main error type for medseed
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read input {}: {reason}", path.display())]
    InputRead { path: PathBuf, reason: String },

    #[error("Database error during {stage}: {reason}")]
    Database { stage: &'static str, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl SeedError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input read error for `path`
    pub fn input_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InputRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a database error tagged with the pipeline stage that failed
    pub fn database(stage: &'static str, reason: impl ToString) -> Self {
        Self::Database {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Exit status the binary should terminate with for this error
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            SeedError::Config(_) | SeedError::Logging(_) => ExitStatus::ConfigError,
            SeedError::InputNotFound(_) | SeedError::InputRead { .. } => ExitStatus::InputError,
            SeedError::Database { .. } => ExitStatus::DatabaseError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_taxonomy() {
        assert_eq!(SeedError::config("missing").exit_status().code(), 1);
        assert_eq!(
            SeedError::InputNotFound(PathBuf::from("x.csv")).exit_status().code(),
            2
        );
        assert_eq!(
            SeedError::input_read("x.csv", "bad header").exit_status().code(),
            2
        );
        assert_eq!(SeedError::database("insert", "boom").exit_status().code(), 3);
        assert_eq!(ExitStatus::Success.code(), 0);
    }

    #[test]
    fn test_error_messages() {
        let err = SeedError::InputNotFound(PathBuf::from("data/meds.csv"));
        assert_eq!(err.to_string(), "Input file not found: data/meds.csv");

        let err = SeedError::database("clear", "connection reset");
        assert_eq!(
            err.to_string(),
            "Database error during clear: connection reset"
        );
    }
}
