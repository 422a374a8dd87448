use crate::actors::generator::ResponseGenerator;
use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::brain::{dispatch, IntentClassifier};
use crate::models::{ChatExchange, ChatRequest};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument};

/// Intent that always hands the conversation to a human.
pub const ESCALATION_INTENT: &str = "Escalation Support";
/// Confidence below which a conversation is handed to a human.
pub const ESCALATION_CONFIDENCE_FLOOR: f32 = 0.3;

const MAILBOX_CAPACITY: usize = 256;

/// Whether a classified message should be escalated to a human agent.
pub fn requires_escalation(intent: &str, confidence: f32) -> bool {
    intent == ESCALATION_INTENT || confidence < ESCALATION_CONFIDENCE_FLOOR
}

/// The per-request pipeline: classify, check escalation, route, generate.
///
/// Holds only shared read-only state, so any number of exchanges can run
/// through it concurrently.
#[derive(Clone)]
pub struct ChatPipeline {
    classifier: Arc<IntentClassifier>,
    generator: ResponseGenerator,
}

impl ChatPipeline {
    pub fn new(classifier: Arc<IntentClassifier>, generator: ResponseGenerator) -> Self {
        Self {
            classifier,
            generator,
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Runs one exchange to completion. Always produces a reply.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, session_id = ?request.session_id))]
    pub async fn process(&self, request: ChatRequest) -> ChatExchange {
        let classification = self.classifier.classify(&request.message);
        let payload = self.classifier.intent_payload(&classification.intent);
        let requires_escalation =
            requires_escalation(&classification.intent, classification.confidence);
        let route = dispatch(&classification.intent, &request.message);

        info!(
            intent = %classification.intent,
            confidence = classification.confidence,
            category = %payload.category,
            requires_context = payload.requires_context,
            action = ?route.as_ref().map(|r| r.action),
            requires_escalation,
            "Message classified"
        );
        debug!(scores = ?classification.scores, "Intent scores");

        let reply = self
            .generator
            .generate(&request.message, &classification.intent, request.context.as_ref())
            .await;

        ChatExchange {
            user_id: request.user_id,
            session_id: request.session_id,
            message: request.message,
            context: request.context,
            classification,
            payload,
            route,
            requires_escalation,
            reply,
        }
    }
}

/// A handle to the `SupervisorActor`.
///
/// This is the primary entry point for chat processing. Each message is
/// handed to the running supervisor, which runs the exchange on its own task.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    reply_timeout: Duration,
}

impl SupervisorHandle {
    /// Spawns the supervisor and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - The injected classification and generation pipeline.
    /// * `reply_timeout` - How long a caller waits for an exchange before giving up.
    ///   Should exceed the LLM timeout so the timeout fallback can be delivered.
    pub fn new(pipeline: ChatPipeline, reply_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = SupervisorRunner {
            receiver,
            pipeline: Arc::new(pipeline),
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }

    /// Processes a customer message and returns the finished exchange.
    ///
    /// Errors only when the exchange could not be completed at all (the
    /// supervisor is gone, the worker task died, or the reply timed out).
    #[instrument(skip(self, request))]
    pub async fn process_chat(&self, request: ChatRequest) -> Result<ChatExchange, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessChat {
            request,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?;
        let exchange = timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?;
        Ok(exchange)
    }

    /// Asks the supervisor to stop. Exchanges already running still finish.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(ActorError::ChannelClosed(e.to_string())))
    }
}

// --- Actor Runner ---
struct SupervisorRunner {
    receiver: mpsc::Receiver<SupervisorMessage>,
    pipeline: Arc<ChatPipeline>,
}

impl SupervisorRunner {
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SupervisorMessage::ProcessChat { request, responder } => {
                    let pipeline = Arc::clone(&self.pipeline);
                    // One task per exchange: a slow upstream call must not hold up the mailbox.
                    tokio::spawn(async move {
                        let exchange = pipeline.process(request).await;
                        if responder.send(exchange).is_err() {
                            error!("Caller went away before the exchange completed");
                        }
                    });
                }
                SupervisorMessage::Shutdown => {
                    info!("Supervisor shutting down...");
                    break;
                }
            }
        }
        info!("Supervisor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_on_intent_regardless_of_confidence() {
        assert!(requires_escalation("Escalation Support", 0.9));
        assert!(requires_escalation("Escalation Support", 1.0));
    }

    #[test]
    fn test_escalation_on_low_confidence() {
        assert!(requires_escalation("Billing Support", 0.29));
        assert!(!requires_escalation("Billing Support", 0.3));
        assert!(!requires_escalation("Telecom Knowledge", 0.3));
    }
}
