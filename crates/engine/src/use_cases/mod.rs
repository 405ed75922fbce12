pub mod dialogue;
pub mod pipeline;
