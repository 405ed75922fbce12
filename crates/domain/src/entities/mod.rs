mod agent;

pub use agent::{Agent, AgentCategory, AgentState};
