//! System prompt construction for the completion call.

use crate::brain::intent::{Intent, TECHNICAL_SUPPORT};
use crate::models::ChatContext;

const BASE_PROMPT: &str = "You are a helpful customer support chatbot for a telecom company.
You are professional, friendly, and knowledgeable about telecom services including internet, mobile, and related technical issues.
Always be concise and helpful. If you don't know something, offer to escalate to a human agent.";

/// Behavioural instruction for an intent; empty for names without one.
pub fn intent_instruction(intent: &str) -> &'static str {
    if intent == TECHNICAL_SUPPORT {
        return "Provide technical assistance and troubleshooting guidance.";
    }
    let Ok(intent) = intent.parse::<Intent>() else {
        return "";
    };
    match intent {
        Intent::AccountInformation => "Focus on account-related queries. Ask for account number if needed.",
        Intent::PlanManagement => "Help with plan upgrades, downgrades, and plan information.",
        Intent::BillingSupport => "Assist with billing inquiries, payments, and invoice questions.",
        Intent::ComplaintManagement => "Be empathetic. Collect complaint details and offer solutions.",
        Intent::InternetIssues => "Provide technical troubleshooting steps for internet connectivity issues.",
        Intent::RouterIssues => "Help with router configuration, WiFi setup, and router-related problems.",
        Intent::CallIssues => "Assist with call quality, signal strength, and call-related problems.",
        Intent::NetworkInformation => "Share information about network coverage and signal strength.",
        Intent::EscalationSupport => "Acknowledge the request and prepare to transfer to human agent.",
        Intent::TelecomKnowledge => "Explain telecom terms and concepts clearly.",
        Intent::ConversationEnd => "Politely end the conversation and offer future assistance.",
        Intent::Feedback | Intent::ServiceControl | Intent::VasServices => "",
    }
}

/// Builds the single system turn: persona, intent label, intent instruction
/// and, when present, the caller's context rendered as JSON.
pub fn build_system_prompt(intent: &str, context: Option<&ChatContext>) -> String {
    let context_str = match context {
        Some(ctx) if !ctx.is_empty() => format!(
            "\nAdditional Context: {}",
            serde_json::Value::Object(ctx.clone())
        ),
        _ => String::new(),
    };

    format!(
        "{}\n\nIntent: {}\n{}{}",
        BASE_PROMPT,
        intent,
        intent_instruction(intent),
        context_str
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_contains_intent_and_instruction() {
        let prompt = build_system_prompt("Billing Support", None);

        assert!(prompt.starts_with("You are a helpful customer support chatbot"));
        assert!(prompt.contains("\n\nIntent: Billing Support\n"));
        assert!(prompt.ends_with("Assist with billing inquiries, payments, and invoice questions."));
        assert!(!prompt.contains("Additional Context"));
    }

    #[test]
    fn test_unknown_intent_has_empty_instruction() {
        let prompt = build_system_prompt("Roaming Deals", None);
        assert!(prompt.ends_with("Intent: Roaming Deals\n"));
    }

    #[test]
    fn test_technical_support_category_has_instruction() {
        assert_eq!(
            intent_instruction("Technical Support"),
            "Provide technical assistance and troubleshooting guidance."
        );
    }

    #[test]
    fn test_context_is_rendered() {
        let context = json!({"account_number": "ACC-1001", "plan": "Fiber 500"});
        let context = context.as_object().unwrap();

        let prompt = build_system_prompt("Account Information", Some(context));
        assert!(prompt.ends_with(
            "\nAdditional Context: {\"account_number\":\"ACC-1001\",\"plan\":\"Fiber 500\"}"
        ));
    }

    #[test]
    fn test_empty_context_is_omitted() {
        let context = ChatContext::new();
        let prompt = build_system_prompt("Feedback", Some(&context));
        assert!(!prompt.contains("Additional Context"));
    }
}
