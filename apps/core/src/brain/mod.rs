//! # Brain Module
//!
//! Fast, non-LLM analysis of the customer's message.
//! Runs BEFORE the LLM call to pick the intent that conditions the prompt.
//!
//! ## Components
//! - `catalog`: the static intent catalog loaded at startup
//! - `intent`: keyword / word-overlap intent classification
//! - `handlers`: per-intent routing table

pub mod catalog;
pub mod handlers;
pub mod intent;

pub use catalog::{IntentCatalog, IntentDefinition};
pub use handlers::{dispatch, HandlerOutcome, HandlerRoute};
pub use intent::{
    categorize, requires_context, ClassificationResult, Intent, IntentClassifier, IntentPayload,
    FALLBACK_CONFIDENCE, FALLBACK_INTENT,
};
