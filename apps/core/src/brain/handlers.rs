//! Per-intent routing table.
//!
//! Each intent maps to an action tag and whether the customer must be
//! authenticated before the action can run. The match in [`Intent::route`]
//! is exhaustive, so adding an intent without a route does not compile.

use serde::Serialize;

use super::intent::Intent;

/// Static routing metadata for one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandlerRoute {
    pub action: &'static str,
    pub requires_auth: bool,
}

impl Intent {
    pub const fn route(self) -> HandlerRoute {
        let (action, requires_auth) = match self {
            Intent::AccountInformation => ("fetch_account_info", true),
            Intent::BillingSupport => ("billing_support", true),
            Intent::PlanManagement => ("manage_plan", true),
            Intent::ComplaintManagement => ("register_complaint", false),
            Intent::InternetIssues => ("troubleshoot_internet", false),
            Intent::RouterIssues => ("troubleshoot_router", false),
            Intent::CallIssues => ("troubleshoot_call", false),
            Intent::NetworkInformation => ("network_info", false),
            Intent::EscalationSupport => ("escalate_to_agent", false),
            Intent::TelecomKnowledge => ("telecom_knowledge", false),
            Intent::ConversationEnd => ("end_conversation", false),
            Intent::Feedback => ("collect_feedback", false),
            Intent::ServiceControl => ("service_control", true),
            Intent::VasServices => ("vas_services", false),
        };
        HandlerRoute {
            action,
            requires_auth,
        }
    }
}

/// What the surrounding glue should do with a classified message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerOutcome {
    pub intent: Intent,
    pub action: &'static str,
    pub requires_auth: bool,
    pub message: String,
}

/// Looks up the route for a classified intent name. Catalog intents the
/// backend has no route for yield `None`.
pub fn dispatch(intent: &str, message: &str) -> Option<HandlerOutcome> {
    let intent: Intent = intent.parse().ok()?;
    let route = intent.route();
    Some(HandlerOutcome {
        intent,
        action: route.action,
        requires_auth: route.requires_auth,
        message: message.to_string(),
    })
}
