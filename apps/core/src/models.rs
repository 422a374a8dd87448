use serde::{Deserialize, Serialize};

use crate::brain::{ClassificationResult, HandlerOutcome, IntentPayload};

/// Caller-supplied context. Opaque to the backend: it is only rendered into
/// the system prompt.
pub type ChatContext = serde_json::Map<String, serde_json::Value>;

/// Represents an inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The identifier of the customer sending the message.
    pub user_id: String,
    /// The raw message text.
    pub message: String,
    /// Optional session identifier, echoed back untouched.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional key/value context passed through to the prompt.
    #[serde(default)]
    pub context: Option<ChatContext>,
}

/// Represents the reply returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub intent: String,
    pub confidence: f32,
    /// The generated (or fallback) reply text.
    pub response: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub requires_escalation: bool,
}

/// Everything produced while handling one chat request. Discarded once the
/// response has been sent.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user_id: String,
    pub session_id: Option<String>,
    pub message: String,
    pub context: Option<ChatContext>,
    pub classification: ClassificationResult,
    pub payload: IntentPayload,
    /// Routing metadata for the intent, if the backend knows one.
    pub route: Option<HandlerOutcome>,
    pub requires_escalation: bool,
    pub reply: String,
}

impl From<ChatExchange> for ChatResponse {
    fn from(exchange: ChatExchange) -> Self {
        Self {
            intent: exchange.classification.intent,
            confidence: exchange.classification.confidence,
            response: exchange.reply,
            session_id: exchange.session_id,
            requires_escalation: exchange.requires_escalation,
        }
    }
}

/// Liveness probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Listing of the loaded intent catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentListResponse {
    /// Intent names in catalog order.
    pub intents: Vec<String>,
    pub total: usize,
}
