use std::fmt;

/// Unified error type for the tablequery crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Invalid input provided by the caller.
    InvalidInput(String),
    /// Missing or malformed configuration.
    Config(String),
    /// The remote store could not be reached or answered with a failure.
    /// Distinct from an empty result set so callers can tell the two apart.
    Transport(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            QueryError::Config(msg) => write!(f, "configuration error: {msg}"),
            QueryError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Result type alias using [`QueryError`].
pub type QueryResult<T> = Result<T, QueryError>;
