use crate::actors::messages::LlmError;
use async_trait::async_trait;

/// Defines the public interface for an LLM completion backend.
///
/// This trait abstracts the external completion API so the response
/// generator can be driven by a test double instead of a live provider.
#[async_trait]
pub trait CompletionApi: Send + Sync + 'static {
    /// Whether a credential is available. When `false`, callers must not
    /// call [`CompletionApi::complete`].
    fn is_configured(&self) -> bool;

    /// Sends one system turn and one user turn and returns the first
    /// choice's text, or `None` when the provider returned no choices.
    async fn complete(&self, system_prompt: String, user_message: String) -> Result<Option<String>, LlmError>;
}
