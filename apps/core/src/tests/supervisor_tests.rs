//! Supervisor Tests
//!
//! Pipeline orchestration through the supervisor actor with a mocked
//! completion API.

use crate::actors::generator::{ResponseGenerator, NOT_CONFIGURED_REPLY, RATE_LIMITED_REPLY};
use crate::actors::messages::{ActorError, AppError, LlmError};
use crate::actors::supervisor::{ChatPipeline, SupervisorHandle};
use crate::brain::{IntentCatalog, IntentClassifier, FALLBACK_INTENT};
use crate::models::{ChatRequest, ChatResponse};
use crate::tests::actor_tests::MockCompletionApi;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;

const SHIPPED_CATALOG: &str = include_str!("../../data/intents.json");

fn pipeline_with(api: Arc<MockCompletionApi>) -> ChatPipeline {
    let catalog = Arc::new(IntentCatalog::from_json_str(SHIPPED_CATALOG).unwrap());
    let classifier = Arc::new(IntentClassifier::new(catalog));
    ChatPipeline::new(classifier, ResponseGenerator::new(api))
}

fn supervisor_with(api: Arc<MockCompletionApi>) -> SupervisorHandle {
    SupervisorHandle::new(pipeline_with(api), Duration::from_secs(5))
}

fn request(message: &str) -> ChatRequest {
    ChatRequest {
        user_id: "user-1".to_string(),
        message: message.to_string(),
        session_id: Some("session-abc".to_string()),
        context: None,
    }
}

#[tokio::test]
async fn test_exchange_carries_classification_and_reply() {
    let api = Arc::new(MockCompletionApi::new("Let's get you back online."));
    let supervisor = supervisor_with(api.clone());

    let exchange = supervisor
        .process_chat(request("my internet is not working"))
        .await
        .unwrap();

    assert_eq!(exchange.classification.intent, "Internet Issues");
    assert_eq!(exchange.payload.category, "Technical Support");
    assert_eq!(exchange.route.as_ref().map(|r| r.action), Some("troubleshoot_internet"));
    assert!(!exchange.requires_escalation);
    assert_eq!(exchange.reply, "Let's get you back online.");

    let response: ChatResponse = exchange.into();
    assert_eq!(response.intent, "Internet Issues");
    assert_eq!(response.confidence, 1.0);
    assert_eq!(response.session_id.as_deref(), Some("session-abc"));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_agent_request_escalates() {
    let supervisor = supervisor_with(Arc::new(MockCompletionApi::new("Connecting you now.")));

    let exchange = supervisor
        .process_chat(request("I want to speak to an agent"))
        .await
        .unwrap();

    assert_eq!(exchange.classification.intent, "Escalation Support");
    assert!(exchange.requires_escalation);
}

#[tokio::test]
async fn test_fallback_intent_does_not_escalate() {
    let supervisor = supervisor_with(Arc::new(MockCompletionApi::new("Could you rephrase?")));

    let exchange = supervisor.process_chat(request("asdf qwer zxcv")).await.unwrap();

    assert_eq!(exchange.classification.intent, FALLBACK_INTENT);
    assert_eq!(exchange.classification.confidence, 0.3);
    assert!(!exchange.requires_escalation);
}

#[tokio::test]
async fn test_context_reaches_prompt() {
    let api = Arc::new(MockCompletionApi::new("Your balance is $12."));
    let supervisor = supervisor_with(api.clone());

    let mut req = request("check my account balance");
    req.context = json!({"account_number": "ACC-7"}).as_object().cloned();
    let exchange = supervisor.process_chat(req).await.unwrap();

    assert!(exchange.payload.requires_context);
    let (system, user) = api.last_prompt().unwrap();
    assert!(system.contains("Intent: Account Information"));
    assert!(system.contains("\"account_number\":\"ACC-7\""));
    assert_eq!(user, "check my account balance");
}

#[tokio::test]
async fn test_upstream_failure_still_answers() {
    let api = Arc::new(MockCompletionApi::failing(LlmError::RateLimited {
        body: "slow down".to_string(),
    }));
    let supervisor = supervisor_with(api);

    let exchange = supervisor.process_chat(request("my bill is wrong")).await.unwrap();

    assert_eq!(exchange.classification.intent, "Billing Support");
    assert_eq!(exchange.reply, RATE_LIMITED_REPLY);
}

#[tokio::test]
async fn test_unconfigured_service_skips_upstream() {
    let api = Arc::new(MockCompletionApi::unconfigured());
    let supervisor = supervisor_with(api.clone());

    let exchange = supervisor.process_chat(request("my bill is wrong")).await.unwrap();

    assert_eq!(exchange.reply, NOT_CONFIGURED_REPLY);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_requests_run_concurrently() {
    let api = Arc::new(MockCompletionApi::new("done").with_delay(300));
    let supervisor = supervisor_with(api.clone());

    let start = Instant::now();
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let supervisor = supervisor.clone();
            tokio::spawn(async move {
                supervisor
                    .process_chat(request(&format!("my bill is wrong #{}", i)))
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().unwrap().reply, "done");
    }

    // Serial handling would take at least 1.5s.
    assert!(start.elapsed() < Duration::from_millis(1200));
    assert_eq!(api.call_count(), 5);
}

#[tokio::test]
async fn test_reply_timeout_is_reported() {
    let api = Arc::new(MockCompletionApi::new("late").with_delay(500));
    let supervisor = SupervisorHandle::new(pipeline_with(api), Duration::from_millis(100));

    let result = supervisor.process_chat(request("my bill is wrong")).await;

    assert!(matches!(result, Err(AppError::Timeout(_))));
}

#[tokio::test]
async fn test_shutdown_closes_mailbox() {
    let supervisor = supervisor_with(Arc::new(MockCompletionApi::new("hi")));

    supervisor.shutdown().await.unwrap();
    // Let the runner observe the shutdown and drop its receiver.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let result = supervisor.process_chat(request("hello")).await;
    assert!(matches!(
        result,
        Err(AppError::Actor(ActorError::ChannelClosed(_)))
    ));
}
