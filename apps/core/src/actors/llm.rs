use crate::actors::messages::LlmError;
use crate::actors::traits::CompletionApi;
use crate::config::{LlmSettings, Provider};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// --- Constants ---
const OPENROUTER_REFERER: &str = "https://telecom-chatbot.local";
const OPENROUTER_TITLE: &str = "Telecom Chatbot";
const MAX_LOGGED_BODY_CHARS: usize = 500;

// --- Wire types (OpenAI-compatible chat completions) ---

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
}

#[derive(Debug, Serialize)]
struct PromptMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [PromptMessage; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// Holds one reusable `reqwest::Client`; cheap to clone and safe to share
/// between concurrent requests.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    settings: LlmSettings,
}

impl HttpCompletionClient {
    /// Builds the client. The configured timeout bounds each whole request.
    pub fn new(settings: LlmSettings) -> Result<Self, AppError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        match &settings.api_key {
            Some(key) => info!(
                provider = %settings.provider,
                model = %settings.model,
                "LLM client initialized, API key present ({} chars)",
                key.len()
            ),
            None => warn!("LLM client initialized without API key; replies will use the not-configured fallback"),
        }

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn provider_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.settings.provider == Provider::OpenRouter {
            headers.insert(
                HeaderName::from_static("http-referer"),
                HeaderValue::from_static(OPENROUTER_REFERER),
            );
            headers.insert(
                HeaderName::from_static("x-title"),
                HeaderValue::from_static(OPENROUTER_TITLE),
            );
        }
        headers
    }
}

/// Shortens an upstream body for logging.
fn truncate_for_log(body: &str) -> String {
    body.chars().take(MAX_LOGGED_BODY_CHARS).collect()
}

#[async_trait]
impl CompletionApi for HttpCompletionClient {
    fn is_configured(&self) -> bool {
        self.settings.has_credential()
    }

    async fn complete(&self, system_prompt: String, user_message: String) -> Result<Option<String>, LlmError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingCredential)?;

        let payload = CompletionRequest {
            model: &self.settings.model,
            messages: [
                PromptMessage {
                    role: Role::System,
                    content: system_prompt,
                },
                PromptMessage {
                    role: Role::User,
                    content: user_message,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(model = %self.settings.model, url = %self.settings.base_url, "Sending completion request");

        let res = self
            .client
            .post(&self.settings.base_url)
            .bearer_auth(api_key)
            .headers(self.provider_headers())
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = truncate_for_log(&res.text().await.unwrap_or_default());
            return Err(match status {
                StatusCode::UNAUTHORIZED => LlmError::Unauthorized { body },
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited { body },
                _ => LlmError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let completion: CompletionResponse = res.json().await?;
        match completion.choices.into_iter().next() {
            None => Ok(None),
            Some(choice) => choice
                .message
                .content
                .map(|content| Some(content.trim().to_string()))
                .ok_or_else(|| LlmError::Decode("first choice has no message content".to_string())),
        }
    }
}
