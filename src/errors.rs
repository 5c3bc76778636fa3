//! Error types for marble operators

use thiserror::Error;

/// Errors that can occur while driving marble operators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarbleError {
    /// A combining function failed; the flush it ran in was abandoned
    #[error("Operator {operator} failed to combine events: {message}")]
    Combine {
        /// Name of the operator whose combinator failed
        operator: String,
        /// Failure description reported by the combinator
        message: String,
    },

    /// The renderer was disposed and cannot render again
    #[error("Unable to use disposed renderer")]
    RendererDisposed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic marble error
    #[error("Marble error: {0}")]
    Generic(String),
}

impl MarbleError {
    /// Build a combine error for the named operator
    pub fn combine(operator: impl Into<String>, message: impl Into<String>) -> Self {
        MarbleError::Combine {
            operator: operator.into(),
            message: message.into(),
        }
    }
}

/// Result type for marble operations
pub type MarbleResult<T> = Result<T, MarbleError>;

impl From<serde_json::Error> for MarbleError {
    fn from(err: serde_json::Error) -> Self {
        MarbleError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_error_message() {
        let err = MarbleError::combine("map", "division by zero");
        assert_eq!(
            err.to_string(),
            "Operator map failed to combine events: division by zero"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: MarbleError = parse.into();
        assert!(matches!(err, MarbleError::Serialization(_)));
    }
}
