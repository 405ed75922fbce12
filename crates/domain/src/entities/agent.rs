//! The agent entity and its lifecycle state machine.
//!
//! Lifecycle transitions are coordinator-driven: the pipeline moves an agent
//! through `Idle -> Thinking -> Acting -> {Idle | Waiting}` and releases
//! `Waiting` agents back to `Idle` on the next tick. Anything else is an
//! invalid transition and is rejected, never silently applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::AgentId;

/// Closed set of agent categories recognized by the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentCategory {
    Lord,
    Villager,
    Soldier,
    Merchant,
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lord => write!(f, "Lord"),
            Self::Villager => write!(f, "Villager"),
            Self::Soldier => write!(f, "Soldier"),
            Self::Merchant => write!(f, "Merchant"),
        }
    }
}

impl FromStr for AgentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lord" => Ok(Self::Lord),
            "Villager" => Ok(Self::Villager),
            "Soldier" => Ok(Self::Soldier),
            "Merchant" => Ok(Self::Merchant),
            other => Err(DomainError::parse(format!(
                "Unknown agent category: {other}"
            ))),
        }
    }
}

/// Lifecycle state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    Idle,
    Thinking,
    Acting,
    Waiting,
}

impl AgentState {
    /// Whether `self -> next` is a legal coordinator-driven transition.
    pub fn can_transition_to(self, next: AgentState) -> bool {
        matches!(
            (self, next),
            (AgentState::Idle, AgentState::Thinking)
                | (AgentState::Thinking, AgentState::Acting)
                | (AgentState::Acting, AgentState::Idle)
                | (AgentState::Acting, AgentState::Waiting)
                | (AgentState::Waiting, AgentState::Idle)
        )
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Thinking => write!(f, "Thinking"),
            Self::Acting => write!(f, "Acting"),
            Self::Waiting => write!(f, "Waiting"),
        }
    }
}

/// An identity-bearing NPC with a bounded think/act lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: String,
    category: AgentCategory,
    state: AgentState,
}

impl Agent {
    /// Create an agent in the initial `Idle` state.
    pub fn new(id: AgentId, name: impl Into<String>, category: AgentCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            state: AgentState::Idle,
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name is the only mutable piece of identity.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn category(&self) -> AgentCategory {
        self.category
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Apply a coordinator-driven lifecycle transition.
    ///
    /// Illegal transitions are rejected with
    /// [`DomainError::InvalidStateTransition`] and leave the agent untouched.
    pub fn transition_to(&mut self, next: AgentState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::invalid_state_transition(format!(
                "{} -> {} (agent {})",
                self.state, next, self.id
            )));
        }
        self.state = next;
        Ok(())
    }

    /// Failure-recovery escape hatch: force the agent back to `Idle` from any
    /// state. Used by the pipeline coordinator when perception or reasoning
    /// faults, so an agent never stays stuck in `Thinking` or `Acting`.
    pub fn force_idle(&mut self) {
        self.state = AgentState::Idle;
    }
}
