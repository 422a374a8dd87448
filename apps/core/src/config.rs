//! Runtime configuration.
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file by the binary). The LLM provider is an explicit setting; the
//! credential's format is never inspected to guess it.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

// --- Constants ---
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_INTENTS_FILE: &str = "data/intents.json";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENROUTER_DEFAULT_MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";
const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// The completion API flavour the backend talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenRouter; requests carry the extra attribution headers.
    OpenRouter,
    /// OpenAI chat completions.
    OpenAi,
    /// Any other OpenAI-compatible endpoint. `LLM_BASE_URL` must be set.
    Custom,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::OpenAi => "openai",
            Provider::Custom => "custom",
        }
    }

    fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some(OPENROUTER_BASE_URL),
            Provider::OpenAi => Some(OPENAI_BASE_URL),
            Provider::Custom => None,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_DEFAULT_MODEL,
            Provider::OpenRouter | Provider::Custom => OPENROUTER_DEFAULT_MODEL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "openai" => Ok(Provider::OpenAi),
            "custom" => Ok(Provider::Custom),
            other => Err(AppError::Config(format!(
                "Unknown LLM_PROVIDER '{}' (expected openrouter, openai or custom)",
                other
            ))),
        }
    }
}

/// Settings for the external completion API.
#[derive(Clone, Validate)]
pub struct LlmSettings {
    pub provider: Provider,
    /// Bearer credential. `None` means the AI service is not configured.
    pub api_key: Option<String>,
    /// Full URL of the chat completions endpoint.
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1, max = 4096))]
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmSettings {
    /// Provider defaults with the given credential.
    ///
    /// `Custom` has no default endpoint, so its `base_url` starts empty and
    /// fails validation until one is supplied.
    pub fn for_provider(provider: Provider, api_key: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            base_url: provider.default_base_url().unwrap_or_default().to_string(),
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

// Keeps the credential out of logs and panic messages.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|k| format!("<redacted, {} chars>", k.len())),
            )
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmSettings,
    /// Path of the JSON intent catalog loaded at startup.
    pub intents_file: PathBuf,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Reads and validates the configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let provider = match env_var("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => Provider::OpenRouter,
        };

        let api_key = env_var("LLM_API_KEY")
            .or_else(|| env_var("OPENROUTER_API_KEY"))
            .or_else(|| env_var("OPENAI_API_KEY"));

        let mut llm = LlmSettings::for_provider(provider, api_key);
        if let Some(base_url) = env_var("LLM_BASE_URL") {
            llm.base_url = base_url;
        }
        if let Some(model) = env_var("LLM_MODEL") {
            llm.model = model;
        }
        if let Some(raw) = env_var("LLM_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                AppError::Config(format!("LLM_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?;
            if secs == 0 {
                return Err(AppError::Config("LLM_TIMEOUT_SECS must be greater than zero".to_string()));
            }
            llm.timeout = Duration::from_secs(secs);
        }
        if provider == Provider::Custom && llm.base_url.is_empty() {
            return Err(AppError::Config(
                "LLM_BASE_URL is required when LLM_PROVIDER=custom".to_string(),
            ));
        }
        llm.validate()?;

        let port = match env_var("PORT").or_else(|| env_var("BACKEND_PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid port '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        let intents_file = env_var("INTENTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INTENTS_FILE));

        let cors_origins = parse_origins(
            &env_var("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        );

        Ok(Self {
            llm,
            intents_file,
            port,
            cors_origins,
        })
    }
}

/// Reads an environment variable, treating blank values as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
