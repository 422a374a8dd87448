use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
///
/// None of these ever reach a customer verbatim: startup errors abort the
/// process, and request-time errors become a generic HTTP 500.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents configuration-related errors (e.g., an unknown provider or a bad port).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents a missing, unreadable or malformed intent catalog.
    #[error("Intent catalog error: {0}")]
    Catalog(String),

    /// Represents a failure to set up the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("no reply within deadline: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}
