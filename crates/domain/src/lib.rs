pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{Agent, AgentCategory, AgentState};
pub use error::DomainError;
pub use ids::AgentId;
pub use value_objects::{
    Action, ActionOutcome, Decision, DialogueContext, DialogueIntent, DialogueResponse,
    EconomySnapshot, Perception, Weather, WeatherCondition,
};
