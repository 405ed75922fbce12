//! Pipeline coordinator use case.
//!
//! Drives one perceive -> reason -> act cycle for one agent:
//! sense the world, ask the reasoning backend for a decision, then dispatch
//! each intended action in order and collect the outcomes. Perception,
//! reasoning, and individual action execution are the only suspension
//! points; state transitions and outcome aggregation are synchronous.
//!
//! Failure policy: a perception or reasoning fault never leaves the agent
//! stuck in `Thinking` or `Acting` - the agent is forced back to `Idle` and
//! the fault is reported to the caller. Cancellation is an expected outcome,
//! not an error.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use npcmind_domain::{
    ActionOutcome, Agent, AgentId, AgentState, Decision, DomainError, Perception,
};

use crate::dispatch::ActionDispatcher;
use crate::infrastructure::ports::{ReasoningError, ReasoningPort, SenseError, SensorPort};

/// Aggregated outcome of one pipeline run, for the reporting collaborator.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub agent_id: AgentId,
    /// The reasoning backend's explanation for the decision.
    pub reasoning: String,
    /// One outcome per attempted action, in execution order.
    pub outcomes: Vec<ActionOutcome>,
    /// Cancellation arrived during action execution; `outcomes` holds only
    /// the actions that completed before it.
    pub cancelled: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Agent must be idle to start a pipeline run, was {0}")]
    AgentBusy(AgentState),
    #[error(transparent)]
    Sense(#[from] SenseError),
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
    #[error("Decision agent id '{got}' does not match requesting agent '{expected}'")]
    DecisionMismatch { expected: AgentId, got: AgentId },
    #[error("Pipeline run cancelled")]
    Cancelled,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Coordinates one reasoning-act cycle per agent.
///
/// Independent agents may run concurrently against the same pipeline; the
/// dispatcher and ports are shared and concurrency-safe.
pub struct AgentPipeline {
    sensor: Arc<dyn SensorPort>,
    reasoner: Arc<dyn ReasoningPort>,
    dispatcher: Arc<ActionDispatcher>,
}

impl AgentPipeline {
    pub fn new(
        sensor: Arc<dyn SensorPort>,
        reasoner: Arc<dyn ReasoningPort>,
        dispatcher: Arc<ActionDispatcher>,
    ) -> Self {
        Self {
            sensor,
            reasoner,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Run one full cycle for an idle agent.
    ///
    /// On success the agent ends in `Idle` (actions executed) or `Waiting`
    /// (empty decision). On any fault or cancellation before acting, the
    /// agent is forced back to `Idle` and the run aborts with zero outcomes.
    pub async fn run(
        &self,
        agent: &mut Agent,
        cancel: CancellationToken,
    ) -> Result<PipelineReport, PipelineError> {
        if agent.state() != AgentState::Idle {
            return Err(PipelineError::AgentBusy(agent.state()));
        }
        agent.transition_to(AgentState::Thinking)?;
        tracing::debug!(agent_id = %agent.id(), "Pipeline run started");

        let perception = match self.perceive(agent.id().clone(), &cancel).await {
            Ok(perception) => perception,
            Err(error) => {
                self.abort_run(agent, &error);
                return Err(error);
            }
        };

        let decision = match self
            .decide(agent.id().clone(), perception, &cancel)
            .await
        {
            Ok(decision) => decision,
            Err(error) => {
                self.abort_run(agent, &error);
                return Err(error);
            }
        };

        agent.transition_to(AgentState::Acting)?;

        if decision.is_idle() {
            agent.transition_to(AgentState::Waiting)?;
            tracing::debug!(agent_id = %agent.id(), "Decision is empty, agent waits");
            return Ok(PipelineReport {
                agent_id: agent.id().clone(),
                reasoning: decision.reasoning().to_string(),
                outcomes: Vec::new(),
                cancelled: false,
            });
        }

        let mut outcomes = Vec::with_capacity(decision.actions().len());
        let mut cancelled = false;
        for action in decision.actions() {
            // Cancellation aborts the remaining, not-yet-started actions
            // only; completed outcomes are preserved.
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let outcome = self.dispatcher.execute(action, &cancel).await;
            tracing::debug!(
                agent_id = %agent.id(),
                action_type = %action.action_type(),
                success = outcome.is_success(),
                "Action dispatched"
            );
            outcomes.push(outcome);
        }

        agent.transition_to(AgentState::Idle)?;
        tracing::info!(
            agent_id = %agent.id(),
            actions = outcomes.len(),
            cancelled,
            "Pipeline run finished"
        );
        Ok(PipelineReport {
            agent_id: agent.id().clone(),
            reasoning: decision.reasoning().to_string(),
            outcomes,
            cancelled,
        })
    }

    /// Next-tick release of a waiting agent back to `Idle`.
    ///
    /// Returns whether the agent was released; agents in any other state are
    /// left untouched.
    pub fn release_waiting(&self, agent: &mut Agent) -> Result<bool, DomainError> {
        if agent.state() != AgentState::Waiting {
            return Ok(false);
        }
        agent.transition_to(AgentState::Idle)?;
        Ok(true)
    }

    async fn perceive(
        &self,
        agent_id: AgentId,
        cancel: &CancellationToken,
    ) -> Result<Perception, PipelineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = self.sensor.perceive(agent_id, cancel.clone()) => {
                match result {
                    Err(SenseError::Cancelled) => Err(PipelineError::Cancelled),
                    other => other.map_err(PipelineError::from),
                }
            }
        }
    }

    async fn decide(
        &self,
        agent_id: AgentId,
        perception: Perception,
        cancel: &CancellationToken,
    ) -> Result<Decision, PipelineError> {
        let expected = agent_id.clone();
        let decision = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            result = self.reasoner.decide(agent_id, perception, cancel.clone()) => {
                match result {
                    Err(ReasoningError::Cancelled) => return Err(PipelineError::Cancelled),
                    other => other?,
                }
            }
        };

        if decision.agent_id() != &expected {
            return Err(PipelineError::DecisionMismatch {
                expected,
                got: decision.agent_id().clone(),
            });
        }
        Ok(decision)
    }

    fn abort_run(&self, agent: &mut Agent, error: &PipelineError) {
        match error {
            PipelineError::Cancelled => {
                tracing::debug!(agent_id = %agent.id(), "Pipeline run cancelled")
            }
            other => {
                tracing::warn!(agent_id = %agent.id(), error = %other, "Pipeline run aborted")
            }
        }
        agent.force_idle();
    }
}
