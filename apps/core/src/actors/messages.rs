use tokio::sync::oneshot;

use crate::models::{ChatExchange, ChatRequest};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Clone)]
pub enum ActorError {
    /// The supervisor's mailbox or a reply channel closed before an answer arrived.
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Failures of a single call to the completion API.
///
/// Upstream bodies are kept for server-side logs only; they never reach the
/// customer.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// No credential configured; no request was sent.
    #[error("no API credential configured")]
    MissingCredential,
    /// HTTP 401.
    #[error("unauthorized (HTTP 401): {body}")]
    Unauthorized { body: String },
    /// HTTP 429.
    #[error("rate limit exceeded (HTTP 429): {body}")]
    RateLimited { body: String },
    /// Any other non-2xx status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// DNS failure, refused connection, TLS handshake failure...
    #[error("connection failed: {0}")]
    Connect(String),
    /// A 2xx response whose body could not be understood.
    #[error("malformed completion response: {0}")]
    Decode(String),
    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Connect(err.to_string())
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A request to classify a customer message and generate a reply.
    ProcessChat {
        request: ChatRequest,
        /// A channel to send the completed exchange back.
        responder: oneshot::Sender<ChatExchange>,
    },
    /// A command to stop accepting new messages.
    Shutdown,
}
