//! Error types for the claim evaluator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while scoring a submission.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during serialization/deserialization of input files.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reference evidence is empty; coverage against it is undefined.
    #[error("Reference evidence is empty; coverage is undefined")]
    DegenerateInput,

    /// A submission or annotation record is missing required fields.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Judge API returned an error.
    #[error("Judge API error: {0}")]
    JudgeApi(String),

    /// Judge response could not be parsed into fact counts.
    #[error("Failed to parse judge response: {0}")]
    Parse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Parse(err.to_string())
    }
}
