//! Intent classification using keyword and word-overlap scoring.
//!
//! Deterministic and model-free: every catalog intent is scored against the
//! message from its example phrases, and the best one wins.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::catalog::IntentCatalog;

/// Intent used when nothing in the catalog scores high enough.
pub const FALLBACK_INTENT: &str = "Telecom Knowledge";
/// Confidence reported with the fallback intent.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;
/// Minimum winning score before the fallback kicks in.
pub const MIN_SCORE: f32 = 0.5;
/// Category shared by the technical intents.
pub const TECHNICAL_SUPPORT: &str = "Technical Support";

const SUBSTRING_BONUS: f32 = 2.0;
const WORD_OVERLAP_BONUS: f32 = 0.5;

/// The intents the backend knows how to route and prompt for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Intent {
    AccountInformation,
    BillingSupport,
    PlanManagement,
    ComplaintManagement,
    InternetIssues,
    RouterIssues,
    CallIssues,
    NetworkInformation,
    EscalationSupport,
    TelecomKnowledge,
    ConversationEnd,
    Feedback,
    ServiceControl,
    VasServices,
}

impl Intent {
    pub const ALL: [Intent; 14] = [
        Intent::AccountInformation,
        Intent::BillingSupport,
        Intent::PlanManagement,
        Intent::ComplaintManagement,
        Intent::InternetIssues,
        Intent::RouterIssues,
        Intent::CallIssues,
        Intent::NetworkInformation,
        Intent::EscalationSupport,
        Intent::TelecomKnowledge,
        Intent::ConversationEnd,
        Intent::Feedback,
        Intent::ServiceControl,
        Intent::VasServices,
    ];

    /// The catalog name of the intent.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::AccountInformation => "Account Information",
            Intent::BillingSupport => "Billing Support",
            Intent::PlanManagement => "Plan Management",
            Intent::ComplaintManagement => "Complaint Management",
            Intent::InternetIssues => "Internet Issues",
            Intent::RouterIssues => "Router Issues",
            Intent::CallIssues => "Call Issues",
            Intent::NetworkInformation => "Network Information",
            Intent::EscalationSupport => "Escalation Support",
            Intent::TelecomKnowledge => "Telecom Knowledge",
            Intent::ConversationEnd => "Conversation End",
            Intent::Feedback => "Feedback",
            Intent::ServiceControl => "Service Control",
            Intent::VasServices => "VAS Services",
        }
    }

    pub fn is_technical(&self) -> bool {
        matches!(
            self,
            Intent::InternetIssues | Intent::RouterIssues | Intent::CallIssues
        )
    }

    pub fn requires_context(&self) -> bool {
        matches!(
            self,
            Intent::AccountInformation
                | Intent::BillingSupport
                | Intent::PlanManagement
                | Intent::ComplaintManagement
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returned when a name does not match any known intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown intent '{}'", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.label() == s)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.label().to_string()
    }
}

impl TryFrom<String> for Intent {
    type Error = UnknownIntent;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Groups intents into categories. The technical intents share
/// "Technical Support"; every other name is its own category.
pub fn categorize(intent: &str) -> &str {
    match intent.parse::<Intent>() {
        Ok(known) if known.is_technical() => TECHNICAL_SUPPORT,
        _ => intent,
    }
}

/// Whether answering the intent usually needs customer-specific context.
pub fn requires_context(intent: &str) -> bool {
    intent
        .parse::<Intent>()
        .map(|known| known.requires_context())
        .unwrap_or(false)
}

/// Result of intent classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning intent name, or the fallback intent
    pub intent: String,
    /// Clamped heuristic score (0.0 - 1.0), not a probability
    pub confidence: f32,
    /// Raw score per catalog intent, for debugging only
    pub scores: BTreeMap<String, f32>,
}

impl ClassificationResult {
    pub fn is_fallback(&self) -> bool {
        self.intent == FALLBACK_INTENT && self.confidence == FALLBACK_CONFIDENCE
    }
}

/// Routing metadata describing an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPayload {
    pub intent: String,
    pub category: String,
    pub requires_context: bool,
}

/// An example phrase, normalized once at construction.
struct PreparedExample {
    text: String,
    tokens: HashSet<String>,
}

struct PreparedIntent {
    name: String,
    multiplier: f32,
    examples: Vec<PreparedExample>,
}

/// Intent classifier over a shared, read-only catalog.
pub struct IntentClassifier {
    catalog: Arc<IntentCatalog>,
    intents: Vec<PreparedIntent>,
}

fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_string).collect()
}

impl IntentClassifier {
    pub fn new(catalog: Arc<IntentCatalog>) -> Self {
        let intents = catalog
            .iter()
            .map(|def| PreparedIntent {
                name: def.name.clone(),
                multiplier: 1.0 / def.priority as f32,
                examples: def
                    .examples
                    .iter()
                    .map(|example| {
                        let text = normalize(example);
                        let tokens = tokens(&text);
                        PreparedExample { text, tokens }
                    })
                    .collect(),
            })
            .collect();

        Self { catalog, intents }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    /// Classify the intent of a message. Never fails: weak or absent signal
    /// yields the fallback intent.
    pub fn classify(&self, message: &str) -> ClassificationResult {
        let message = normalize(message);
        let message_tokens = tokens(&message);

        let mut scores = BTreeMap::new();
        let mut best: Option<(&str, f32)> = None;

        for intent in &self.intents {
            let mut score = 0.0;
            // Overlap credit is counted per example, so richer intents accumulate more.
            for example in &intent.examples {
                if message.contains(example.text.as_str()) {
                    score += SUBSTRING_BONUS;
                }
                let common = example.tokens.intersection(&message_tokens).count();
                score += common as f32 * WORD_OVERLAP_BONUS;
            }
            score *= intent.multiplier;

            scores.insert(intent.name.clone(), score);
            // Strictly greater: the first maximum in catalog order wins ties.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((intent.name.as_str(), score));
            }
        }

        let (intent, confidence) = match best {
            Some((name, score)) if score >= MIN_SCORE => (name.to_string(), score.min(1.0)),
            _ => (FALLBACK_INTENT.to_string(), FALLBACK_CONFIDENCE),
        };

        ClassificationResult {
            intent,
            confidence,
            scores,
        }
    }

    pub fn categorize<'a>(&self, intent: &'a str) -> &'a str {
        categorize(intent)
    }

    pub fn requires_context(&self, intent: &str) -> bool {
        requires_context(intent)
    }

    /// Routing metadata for an intent name.
    pub fn intent_payload(&self, intent: &str) -> IntentPayload {
        IntentPayload {
            intent: intent.to_string(),
            category: categorize(intent).to_string(),
            requires_context: requires_context(intent),
        }
    }
}
