//! Action dispatch registry.
//!
//! Runtime-extensible mapping from action-type tags to handlers. Action
//! types are open-ended: gameplay modules register new handlers without the
//! pipeline changing, so this is a dispatch table, not a closed enum.
//!
//! Failure containment is uniform: a missing handler and a faulting handler
//! both come back as failure outcomes. Nothing a handler does propagates as
//! a fault to the caller.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use npcmind_domain::{Action, ActionOutcome};

use crate::infrastructure::ports::ActionHandler;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Action type cannot be empty")]
    EmptyActionType,
}

/// Registry of action handlers keyed by lowercased action type.
///
/// Safe for concurrent registration and execution from independent agent
/// pipelines.
#[derive(Default)]
pub struct ActionDispatcher {
    handlers: DashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action type. Matching is case-insensitive;
    /// re-registering a type replaces the previous handler (last write wins).
    pub fn register(
        &self,
        action_type: &str,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), RegistryError> {
        let key = normalize(action_type)?;
        tracing::debug!(action_type = %key, "Registering action handler");
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Convenience form for synchronous handlers: wraps the closure in an
    /// adapter that satisfies [`ActionHandler`].
    pub fn register_fn<F>(&self, action_type: &str, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&Action) -> ActionOutcome + Send + Sync + 'static,
    {
        self.register(action_type, Arc::new(SyncFnHandler { f }))
    }

    /// Pure lookup: is a handler registered for this type? Case-insensitive,
    /// never mutates.
    pub fn can_execute(&self, action_type: &str) -> bool {
        self.handlers
            .contains_key(&action_type.to_ascii_lowercase())
    }

    /// Execute one action through its registered handler.
    ///
    /// An unregistered type is a normal, expected failure outcome naming the
    /// type. A handler fault (including cancellation the handler raises) is
    /// captured here and converted to a failure outcome carrying the fault's
    /// message and full detail. A successful handler outcome passes through
    /// unwrapped.
    pub async fn execute(&self, action: &Action, cancel: &CancellationToken) -> ActionOutcome {
        let key = action.action_type().to_ascii_lowercase();
        let handler = match self.handlers.get(&key) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                return ActionOutcome::failure(format!(
                    "No handler registered for action type: {}",
                    action.action_type()
                ));
            }
        };

        match handler.handle(action, cancel.clone()).await {
            Ok(outcome) => outcome,
            Err(fault) => {
                tracing::warn!(
                    action_type = %action.action_type(),
                    error = %fault,
                    "Action handler faulted"
                );
                ActionOutcome::failure_with_detail(fault.to_string(), format!("{fault:#}"))
            }
        }
    }
}

fn normalize(action_type: &str) -> Result<String, RegistryError> {
    if action_type.trim().is_empty() {
        return Err(RegistryError::EmptyActionType);
    }
    Ok(action_type.to_ascii_lowercase())
}

/// Adapter lifting a synchronous closure into the async handler shape.
struct SyncFnHandler<F> {
    f: F,
}

#[async_trait::async_trait]
impl<F> ActionHandler for SyncFnHandler<F>
where
    F: Fn(&Action) -> ActionOutcome + Send + Sync,
{
    async fn handle(
        &self,
        action: &Action,
        _cancel: CancellationToken,
    ) -> anyhow::Result<ActionOutcome> {
        Ok((self.f)(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingHandler;

    #[async_trait]
    impl ActionHandler for FailingHandler {
        async fn handle(
            &self,
            _action: &Action,
            _cancel: CancellationToken,
        ) -> anyhow::Result<ActionOutcome> {
            Err(anyhow::anyhow!("bridge is out").context("pathfinding failed"))
        }
    }

    fn action(action_type: &str) -> Action {
        Action::new(action_type).expect("valid action")
    }

    #[test]
    fn test_register_rejects_empty_type() {
        let dispatcher = ActionDispatcher::new();
        let err = dispatcher
            .register_fn("", |_| ActionOutcome::success("noop"))
            .expect_err("empty type");
        assert!(matches!(err, RegistryError::EmptyActionType));
    }

    #[test]
    fn test_can_execute_is_case_insensitive() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register_fn("MoveTo", |_| ActionOutcome::success("moved"))
            .expect("register");

        assert!(dispatcher.can_execute("MoveTo"));
        assert!(dispatcher.can_execute("moveto"));
        assert!(dispatcher.can_execute("MOVETO"));
        assert!(!dispatcher.can_execute("Attack"));
    }

    #[tokio::test]
    async fn test_execute_unregistered_type_names_it() {
        let dispatcher = ActionDispatcher::new();
        let outcome = dispatcher
            .execute(&action("Attack"), &CancellationToken::new())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.message(),
            "No handler registered for action type: Attack"
        );
    }

    #[tokio::test]
    async fn test_execute_matches_case_insensitively() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register_fn("MoveTo", |_| ActionOutcome::success("moved"))
            .expect("register");

        let outcome = dispatcher
            .execute(&action("mOvEtO"), &CancellationToken::new())
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "moved");
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register_fn("Trade", |_| ActionOutcome::success("first"))
            .expect("register");
        dispatcher
            .register_fn("TRADE", |_| ActionOutcome::success("second"))
            .expect("register");

        let outcome = dispatcher
            .execute(&action("trade"), &CancellationToken::new())
            .await;
        assert_eq!(outcome.message(), "second");
    }

    #[tokio::test]
    async fn test_handler_fault_is_contained() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register("MoveTo", Arc::new(FailingHandler))
            .expect("register");

        let outcome = dispatcher
            .execute(&action("MoveTo"), &CancellationToken::new())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "pathfinding failed");
        // Detail carries the full error chain.
        let detail = outcome.detail().expect("detail present");
        assert!(detail.contains("bridge is out"));
    }

    #[tokio::test]
    async fn test_successful_outcome_passes_through() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register_fn("Rest", |action| {
                ActionOutcome::success(format!("rested at {}", action.action_type()))
            })
            .expect("register");

        let outcome = dispatcher
            .execute(&action("Rest"), &CancellationToken::new())
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "rested at Rest");
    }

    #[tokio::test]
    async fn test_handler_reported_failure_is_not_rewrapped() {
        let dispatcher = ActionDispatcher::new();
        dispatcher
            .register_fn("Raid", |_| ActionOutcome::failure("village is empty"))
            .expect("register");

        let outcome = dispatcher
            .execute(&action("Raid"), &CancellationToken::new())
            .await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "village is empty");
        assert!(outcome.detail().is_none());
    }
}
