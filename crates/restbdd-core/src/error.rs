use thiserror::Error;

/// Error type for everything a step can fail with
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Process configuration is unusable (malformed proxy, missing base URI)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation ran before its prerequisite state existed
    #[error("State error: {0}")]
    State(String),

    /// A step parameter violates a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Expected and actual values differ
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Network or timeout failure, wrapped with the request that caused it
    #[error("Failed to execute {method} request to {endpoint}: {message}")]
    Transport {
        /// HTTP method as written in the step
        method: String,
        /// Endpoint path the request was sent to
        endpoint: String,
        /// Underlying client error
        message: String,
    },

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HarnessError {
    /// Short label for the error category, used in scenario logs
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::Configuration(_) => "configuration",
            HarnessError::State(_) => "state",
            HarnessError::InvalidArgument(_) => "invalid-argument",
            HarnessError::Assertion(_) => "assertion",
            HarnessError::Transport { .. } | HarnessError::Http(_) => "transport",
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
