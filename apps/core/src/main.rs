// Telecom Chat Backend Entry Point

use anyhow::Context;
use std::sync::Arc;
use telecom_chat_core::actors::generator::ResponseGenerator;
use telecom_chat_core::actors::llm::HttpCompletionClient;
use telecom_chat_core::actors::supervisor::{ChatPipeline, SupervisorHandle};
use telecom_chat_core::brain::{IntentCatalog, IntentClassifier};
use telecom_chat_core::config::Settings;
use telecom_chat_core::logging::init_tracing;
use telecom_chat_core::server::{self, AppState};
use tokio::time::Duration;
use tracing::info;

/// Extra time a caller waits beyond the LLM timeout, so the timeout reply
/// still reaches the customer.
const REPLY_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env().context("Invalid configuration")?;
    info!("Starting Telecom Chatbot API with {:?}", settings.llm);

    let catalog = IntentCatalog::load(&settings.intents_file).with_context(|| {
        format!("Failed to load intent catalog from {}", settings.intents_file.display())
    })?;
    let catalog = Arc::new(catalog);

    let client = HttpCompletionClient::new(settings.llm.clone())?;

    let classifier = Arc::new(IntentClassifier::new(Arc::clone(&catalog)));
    let generator = ResponseGenerator::new(Arc::new(client));
    let pipeline = ChatPipeline::new(classifier, generator);
    let supervisor = SupervisorHandle::new(pipeline, settings.llm.timeout + REPLY_GRACE);

    let state = AppState {
        supervisor,
        catalog,
    };
    server::run(state, &settings).await
}
