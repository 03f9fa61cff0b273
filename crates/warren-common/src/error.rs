//! Error types for Warren
//!
//! Missing configuration is never an error; it resolves to a zero value.
//! Address resolution failures are recovered where they happen. What is left
//! here are the failures a caller has to act on.

use std::fmt::{Display, Formatter};

/// Which selection input a pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Positional service selector captured from the argument vector
    Selector,
    /// Exclusion pattern read from configuration
    Exclusion,
}

impl PatternKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Selector => "selector",
            PatternKind::Exclusion => "exclusion",
        }
    }
}

impl Display for PatternKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: PatternKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("spawn error: {0}")]
    SpawnError(String),
}

pub type Result<T> = std::result::Result<T, WarrenError>;
