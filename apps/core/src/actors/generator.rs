//! Reply generation: prompt the completion API and turn every failure into a
//! fixed, customer-safe sentence.

use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::actors::messages::LlmError;
use crate::actors::prompt::build_system_prompt;
use crate::actors::traits::CompletionApi;
use crate::models::ChatContext;

pub const NOT_CONFIGURED_REPLY: &str =
    "I apologize, but the AI service is not configured. Please contact support.";
pub const EMPTY_COMPLETION_REPLY: &str =
    "I'm sorry, I couldn't generate a response. Please try again.";
pub const AUTH_FAILURE_REPLY: &str =
    "I apologize, but there's an authentication issue with the AI service. Please contact support.";
pub const RATE_LIMITED_REPLY: &str =
    "I'm currently experiencing high demand. Please try again in a moment.";
pub const TECHNICAL_DIFFICULTIES_REPLY: &str =
    "I'm experiencing technical difficulties. Please try again later or contact support.";
pub const TIMEOUT_REPLY: &str = "The AI service is taking too long to respond. Please try again.";
pub const CONNECTION_FAILURE_REPLY: &str =
    "I'm unable to connect to the AI service. Please check your internet connection and try again.";

/// The reply shown to the customer for a failed completion call.
pub fn fallback_reply(err: &LlmError) -> &'static str {
    match err {
        LlmError::MissingCredential => NOT_CONFIGURED_REPLY,
        LlmError::Unauthorized { .. } => AUTH_FAILURE_REPLY,
        LlmError::RateLimited { .. } => RATE_LIMITED_REPLY,
        LlmError::Timeout => TIMEOUT_REPLY,
        LlmError::Connect(_) => CONNECTION_FAILURE_REPLY,
        LlmError::Status { .. } | LlmError::Decode(_) | LlmError::Transport(_) => {
            TECHNICAL_DIFFICULTIES_REPLY
        }
    }
}

/// Produces customer-facing replies through a [`CompletionApi`].
#[derive(Clone)]
pub struct ResponseGenerator {
    api: Arc<dyn CompletionApi>,
}

impl ResponseGenerator {
    pub fn new(api: Arc<dyn CompletionApi>) -> Self {
        Self { api }
    }

    /// Generates a reply for a classified message. Never fails and never
    /// retries: each upstream failure maps to one fixed sentence.
    #[instrument(skip(self, message, context))]
    pub async fn generate(&self, message: &str, intent: &str, context: Option<&ChatContext>) -> String {
        if !self.api.is_configured() {
            warn!("No API credential configured, skipping completion call");
            return NOT_CONFIGURED_REPLY.to_string();
        }

        let system_prompt = build_system_prompt(intent, context);
        match self.api.complete(system_prompt, message.to_string()).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                warn!("Completion API returned no choices");
                EMPTY_COMPLETION_REPLY.to_string()
            }
            Err(err) => {
                error!(error = %err, "LLM API call failed");
                fallback_reply(&err).to_string()
            }
        }
    }
}
