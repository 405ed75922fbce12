//! NpcMind engine: the perceive -> reason -> act pipeline, the action
//! dispatch registry, and the dialogue exchange.
//!
//! World sensing, the reasoning backend, and the dialogue backend live
//! outside this crate and are reached only through the port traits in
//! [`infrastructure::ports`].

pub mod dispatch;
pub mod infrastructure;
pub mod use_cases;

pub use dispatch::{ActionDispatcher, RegistryError};
pub use use_cases::dialogue::DialogueExchange;
pub use use_cases::pipeline::{AgentPipeline, PipelineError, PipelineReport};
