//! Decisions, actions, and action outcomes.
//!
//! A `Decision` is the reasoning backend's answer for one agent: a non-empty
//! explanation plus an ordered list of intended actions. Actions carry
//! dynamically typed parameters (`serde_json::Value`), interpreted by the
//! handler registered for their type; the dispatch layer never looks inside.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;
use crate::ids::AgentId;

/// An abstract, parameterized intention to be carried out in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    action_type: String,
    parameters: serde_json::Map<String, Value>,
}

impl Action {
    /// Create an action. The type tag must be non-empty; it is matched
    /// case-insensitively against registered handlers.
    pub fn new(action_type: impl Into<String>) -> Result<Self, DomainError> {
        let action_type = action_type.into();
        if action_type.trim().is_empty() {
            return Err(DomainError::validation("action type cannot be empty"));
        }
        Ok(Self {
            action_type,
            parameters: serde_json::Map::new(),
        })
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn parameters(&self) -> &serde_json::Map<String, Value> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

/// Reasoning output: explanation text plus an ordered list of actions.
///
/// An empty action list means "do nothing this tick"; an empty explanation
/// is a contract violation and is rejected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    agent_id: AgentId,
    reasoning: String,
    actions: Vec<Action>,
}

impl Decision {
    pub fn new(
        agent_id: AgentId,
        reasoning: impl Into<String>,
        actions: Vec<Action>,
    ) -> Result<Self, DomainError> {
        let reasoning = reasoning.into();
        if reasoning.trim().is_empty() {
            return Err(DomainError::validation(
                "decision reasoning cannot be empty",
            ));
        }
        Ok(Self {
            agent_id,
            reasoning,
            actions,
        })
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Actions in execution order. Order is significant: the pipeline
    /// executes them as given, never reordered or parallelized.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The agent chose to do nothing this tick.
    pub fn is_idle(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Outcome of executing one action. The message is always present and never
/// empty: an empty or whitespace-only message from a handler is replaced by
/// a fixed placeholder rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    success: bool,
    message: String,
    detail: Option<String>,
}

/// Stand-in stored when a handler supplies an empty outcome message.
const EMPTY_MESSAGE_PLACEHOLDER: &str = "(no message provided)";

fn non_empty_message(message: impl Into<String>) -> String {
    let message = message.into();
    if message.trim().is_empty() {
        EMPTY_MESSAGE_PLACEHOLDER.to_string()
    } else {
        message
    }
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: non_empty_message(message),
            detail: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: non_empty_message(message),
            detail: None,
        }
    }

    /// Failure carrying the underlying fault detail alongside the message.
    pub fn failure_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: non_empty_message(message),
            detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent_id() -> AgentId {
        AgentId::new("lord_1_14").expect("valid id")
    }

    #[test]
    fn test_empty_action_type_rejected() {
        assert!(Action::new("").is_err());
        assert!(Action::new("  ").is_err());
    }

    #[test]
    fn test_action_parameters() {
        let action = Action::new("MoveTo")
            .expect("valid action")
            .with_parameter("target", "town_V1")
            .with_parameter("speed", 2)
            .with_parameter("escort", json!({ "size": 10, "mounted": true }));

        assert_eq!(action.action_type(), "MoveTo");
        assert_eq!(action.parameter("target"), Some(&json!("town_V1")));
        assert_eq!(action.parameter("speed"), Some(&json!(2)));
        assert_eq!(
            action.parameter("escort").and_then(|v| v.get("mounted")),
            Some(&json!(true))
        );
        assert!(action.parameter("missing").is_none());
    }

    #[test]
    fn test_empty_reasoning_rejected() {
        let err = Decision::new(agent_id(), "", vec![]).expect_err("empty reasoning");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_empty_actions_means_do_nothing() {
        let decision =
            Decision::new(agent_id(), "Nothing worth doing right now.", vec![])
                .expect("valid decision");
        assert!(decision.is_idle());
    }

    #[test]
    fn test_action_order_preserved() {
        let actions = vec![
            Action::new("MoveTo").expect("valid"),
            Action::new("Trade").expect("valid"),
            Action::new("Rest").expect("valid"),
        ];
        let decision = Decision::new(agent_id(), "Busy day ahead.", actions)
            .expect("valid decision");
        let types: Vec<&str> = decision.actions().iter().map(Action::action_type).collect();
        assert_eq!(types, ["MoveTo", "Trade", "Rest"]);
    }

    #[test]
    fn test_outcome_factories() {
        let ok = ActionOutcome::success("moved");
        assert!(ok.is_success());
        assert_eq!(ok.message(), "moved");
        assert!(ok.detail().is_none());

        let failed = ActionOutcome::failure_with_detail("move failed", "path blocked");
        assert!(!failed.is_success());
        assert_eq!(failed.detail(), Some("path blocked"));
    }

    #[test]
    fn test_outcome_message_is_never_empty() {
        for outcome in [
            ActionOutcome::success(""),
            ActionOutcome::failure("   "),
            ActionOutcome::failure_with_detail("", "handler said nothing"),
        ] {
            assert_eq!(outcome.message(), "(no message provided)");
        }

        // Non-empty messages are stored verbatim.
        assert_eq!(ActionOutcome::success("moved").message(), "moved");
    }
}
