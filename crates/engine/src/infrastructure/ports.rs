//! Port traits for the engine's external collaborators.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - World sensing (the host simulation produces perceptions)
//! - Reasoning (an LLM-backed planner turns perceptions into decisions)
//! - Dialogue generation (free-text conversational exchanges)
//! - Action handlers (open-ended gameplay effects, registered at runtime)

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use npcmind_domain::{
    Action, ActionOutcome, AgentId, Decision, DialogueContext, DialogueResponse, Perception,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SenseError {
    #[error("Sensing failed: {0}")]
    Failed(String),
    #[error("Sensing cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("Reasoning request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid reasoning response: {0}")]
    InvalidResponse(String),
    #[error("Reasoning cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Dialogue request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid dialogue response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// World Sensor Port
// =============================================================================

/// Reads a world-state snapshot for one agent from the host simulation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SensorPort: Send + Sync {
    async fn perceive(
        &self,
        agent_id: AgentId,
        cancel: CancellationToken,
    ) -> Result<Perception, SenseError>;
}

// =============================================================================
// Reasoning Port
// =============================================================================

/// Turns a perception into a decision for one agent.
///
/// Implementations must return a decision whose agent id matches the input
/// and whose action list is present (possibly empty). The pipeline treats an
/// id mismatch as a validation fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReasoningPort: Send + Sync {
    async fn decide(
        &self,
        agent_id: AgentId,
        perception: Perception,
        cancel: CancellationToken,
    ) -> Result<Decision, ReasoningError>;
}

// =============================================================================
// Dialogue Port
// =============================================================================

/// Generates a free-text conversational response for one NPC.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DialoguePort: Send + Sync {
    async fn generate_response(
        &self,
        npc_id: AgentId,
        npc_name: String,
        npc_role: String,
        player_message: String,
        context: DialogueContext,
        cancel: CancellationToken,
    ) -> Result<DialogueResponse, DialogueError>;
}

// =============================================================================
// Action Handler Port
// =============================================================================

/// One executable gameplay effect, registered against an action type.
///
/// Handlers are open-ended, so faults are carried as `anyhow::Error`; the
/// dispatch registry contains them and converts them into failure outcomes.
/// A handler that ignores the cancellation token is not forcibly
/// interrupted; cancellation it does raise is captured like any other fault.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        action: &Action,
        cancel: CancellationToken,
    ) -> anyhow::Result<ActionOutcome>;
}
