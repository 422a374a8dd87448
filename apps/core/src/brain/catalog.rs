//! Intent catalog: the static set of intents and their example phrases.
//!
//! Loaded once at startup from a JSON object of the form
//! `{ "<intent name>": { "examples": [...], "priority": 1 } }`.
//! Entry order in the file is preserved and drives tie-breaking in the
//! classifier.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use super::intent::{categorize, requires_context};
use crate::error::AppError;

fn default_priority() -> u32 {
    1
}

/// Shape of one entry in the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default = "default_priority")]
    priority: u32,
}

/// A single intent with its scoring data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentDefinition {
    pub name: String,
    pub examples: Vec<String>,
    /// Lower value means a stronger boost (score multiplier is `1 / priority`).
    pub priority: u32,
}

impl IntentDefinition {
    pub fn new(name: impl Into<String>, examples: Vec<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            examples,
            priority,
        }
    }

    pub fn category(&self) -> &str {
        categorize(&self.name)
    }

    pub fn requires_context(&self) -> bool {
        requires_context(&self.name)
    }
}

/// Immutable, ordered collection of intent definitions.
#[derive(Debug, Clone, Default)]
pub struct IntentCatalog {
    intents: Vec<IntentDefinition>,
}

impl IntentCatalog {
    /// Reads and validates a catalog file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} intents from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses a catalog from its JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| AppError::Catalog(format!("malformed catalog: {}", e)))?;

        let mut intents = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let entry: CatalogEntry = serde_json::from_value(value)
                .map_err(|e| AppError::Catalog(format!("intent '{}': {}", name, e)))?;
            intents.push(IntentDefinition::new(name, entry.examples, entry.priority));
        }

        Self::from_definitions(intents)
    }

    /// Builds a catalog from definitions, enforcing the catalog invariants.
    pub fn from_definitions(intents: Vec<IntentDefinition>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for intent in &intents {
            if intent.name.trim().is_empty() {
                return Err(AppError::Catalog("intent names must not be empty".to_string()));
            }
            if !seen.insert(intent.name.as_str()) {
                return Err(AppError::Catalog(format!("duplicate intent '{}'", intent.name)));
            }
            if intent.priority == 0 {
                return Err(AppError::Catalog(format!(
                    "intent '{}': priority must be at least 1",
                    intent.name
                )));
            }
            // A blank example is a substring of every message.
            if intent.examples.iter().any(|e| e.trim().is_empty()) {
                return Err(AppError::Catalog(format!(
                    "intent '{}': examples must not be blank",
                    intent.name
                )));
            }
        }
        Ok(Self { intents })
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntentDefinition> {
        self.intents.iter()
    }

    pub fn get(&self, name: &str) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.name == name)
    }

    /// Intent names in catalog order.
    pub fn names(&self) -> Vec<String> {
        self.intents.iter().map(|i| i.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_order_is_preserved() {
        let catalog = IntentCatalog::from_json_str(
            r#"{
                "Router Issues": {"examples": ["reset my router"], "priority": 1},
                "Billing Support": {"examples": ["pay my bill"], "priority": 1},
                "Account Information": {"examples": ["account details"], "priority": 2}
            }"#,
        )
        .unwrap();

        assert_eq!(
            catalog.names(),
            vec!["Router Issues", "Billing Support", "Account Information"]
        );
    }

    #[test]
    fn test_priority_defaults_to_one() {
        let catalog = IntentCatalog::from_json_str(r#"{"Feedback": {"examples": ["feedback"]}}"#).unwrap();
        assert_eq!(catalog.get("Feedback").unwrap().priority, 1);
    }

    #[test]
    fn test_derived_fields() {
        let catalog = IntentCatalog::from_json_str(
            r#"{"Call Issues": {"examples": ["call drops"]}, "Billing Support": {"examples": ["invoice"]}}"#,
        )
        .unwrap();

        let call = catalog.get("Call Issues").unwrap();
        assert_eq!(call.category(), "Technical Support");
        assert!(!call.requires_context());

        let billing = catalog.get("Billing Support").unwrap();
        assert_eq!(billing.category(), "Billing Support");
        assert!(billing.requires_context());
    }

    #[test]
    fn test_invalid_catalogs_are_rejected() {
        let cases = [
            "not json",
            r#"["a", "b"]"#,
            r#"{"Feedback": {"examples": ["feedback"], "priority": 0}}"#,
            r#"{"Feedback": {"examples": ["feedback"], "priority": -2}}"#,
            r#"{"Feedback": {"examples": "feedback"}}"#,
            r#"{"Feedback": {"examples": ["  "]}}"#,
            r#"{"": {"examples": ["x"]}}"#,
        ];

        for raw in cases {
            let result = IntentCatalog::from_json_str(raw);
            assert!(
                matches!(result, Err(AppError::Catalog(_))),
                "Expected catalog error for {}",
                raw
            );
        }
    }

    #[test]
    fn test_duplicate_definitions_are_rejected() {
        let defs = vec![
            IntentDefinition::new("Feedback", vec!["feedback".to_string()], 1),
            IntentDefinition::new("Feedback", vec!["rate us".to_string()], 2),
        ];
        assert!(IntentCatalog::from_definitions(defs).is_err());
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = IntentCatalog::from_json_str("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Conversation End": {{"examples": ["bye"], "priority": 2}}}}"#).unwrap();

        let catalog = IntentCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Conversation End").unwrap().priority, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = IntentCatalog::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }
}
