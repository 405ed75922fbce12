mod decision;
mod dialogue;
mod perception;

pub use decision::{Action, ActionOutcome, Decision};
pub use dialogue::{DialogueContext, DialogueIntent, DialogueResponse};
pub use perception::{EconomySnapshot, Perception, Weather, WeatherCondition};
