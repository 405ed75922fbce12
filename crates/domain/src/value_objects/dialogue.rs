//! Dialogue request context and generated responses.
//!
//! Independent of the action pipeline: conversations go straight from the
//! player's utterance plus a context snapshot to the dialogue backend. The
//! only invariant that matters to callers is graceful degradation, captured
//! by [`DialogueResponse::error`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Conversational intent behind a generated response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueIntent {
    #[default]
    Neutral,
    Friendly,
    Hostile,
    Bargaining,
    Informative,
    Threatening,
    Pleading,
    Dismissive,
}

impl fmt::Display for DialogueIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "Neutral"),
            Self::Friendly => write!(f, "Friendly"),
            Self::Hostile => write!(f, "Hostile"),
            Self::Bargaining => write!(f, "Bargaining"),
            Self::Informative => write!(f, "Informative"),
            Self::Threatening => write!(f, "Threatening"),
            Self::Pleading => write!(f, "Pleading"),
            Self::Dismissive => write!(f, "Dismissive"),
        }
    }
}

/// Situation snapshot handed to the dialogue backend alongside the player's
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueContext {
    location: String,
    player_relation: i32,
    npc_faction: String,
    player_faction: String,
    at_war: bool,
    current_situation: String,
    recent_events: Vec<String>,
    npc_mood: String,
}

impl Default for DialogueContext {
    fn default() -> Self {
        Self {
            location: String::new(),
            player_relation: 0,
            npc_faction: String::new(),
            player_faction: String::new(),
            at_war: false,
            current_situation: String::new(),
            recent_events: Vec::new(),
            npc_mood: "Neutral".to_string(),
        }
    }
}

impl DialogueContext {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_player_relation(mut self, relation: i32) -> Self {
        self.player_relation = relation;
        self
    }

    pub fn with_factions(
        mut self,
        npc_faction: impl Into<String>,
        player_faction: impl Into<String>,
    ) -> Self {
        self.npc_faction = npc_faction.into();
        self.player_faction = player_faction.into();
        self
    }

    pub fn with_at_war(mut self, at_war: bool) -> Self {
        self.at_war = at_war;
        self
    }

    pub fn with_current_situation(mut self, situation: impl Into<String>) -> Self {
        self.current_situation = situation.into();
        self
    }

    pub fn with_recent_event(mut self, event: impl Into<String>) -> Self {
        self.recent_events.push(event.into());
        self
    }

    pub fn with_npc_mood(mut self, mood: impl Into<String>) -> Self {
        self.npc_mood = mood.into();
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn player_relation(&self) -> i32 {
        self.player_relation
    }

    pub fn npc_faction(&self) -> &str {
        &self.npc_faction
    }

    pub fn player_faction(&self) -> &str {
        &self.player_faction
    }

    pub fn at_war(&self) -> bool {
        self.at_war
    }

    pub fn current_situation(&self) -> &str {
        &self.current_situation
    }

    /// Recent events, oldest first.
    pub fn recent_events(&self) -> &[String] {
        &self.recent_events
    }

    pub fn npc_mood(&self) -> &str {
        &self.npc_mood
    }
}

/// A generated conversational exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueResponse {
    text: String,
    emotion: String,
    intent: DialogueIntent,
    end_conversation: bool,
}

impl Default for DialogueResponse {
    fn default() -> Self {
        Self {
            text: String::new(),
            emotion: "Neutral".to_string(),
            intent: DialogueIntent::Neutral,
            end_conversation: false,
        }
    }
}

impl DialogueResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Canonical fallback when the dialogue backend fails: the error message
    /// becomes the response text, spoken with a fixed "Confused" emotion, so
    /// conversation flow degrades instead of aborting.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            emotion: "Confused".to_string(),
            intent: DialogueIntent::Neutral,
            end_conversation: false,
        }
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = emotion.into();
        self
    }

    pub fn with_intent(mut self, intent: DialogueIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_end_conversation(mut self, end: bool) -> Self {
        self.end_conversation = end;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emotion(&self) -> &str {
        &self.emotion
    }

    pub fn intent(&self) -> DialogueIntent {
        self.intent
    }

    pub fn end_conversation(&self) -> bool {
        self.end_conversation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let context = DialogueContext::new();
        assert_eq!(context.npc_mood(), "Neutral");
        assert!(!context.at_war());
        assert!(context.recent_events().is_empty());
    }

    #[test]
    fn test_context_builders() {
        let context = DialogueContext::new()
            .with_location("town_V1")
            .with_player_relation(-30)
            .with_factions("Vlandia", "Battania")
            .with_at_war(true)
            .with_current_situation("The siege ended yesterday.")
            .with_recent_event("Market burned down")
            .with_recent_event("New levy announced")
            .with_npc_mood("Angry");

        assert_eq!(context.location(), "town_V1");
        assert_eq!(context.player_relation(), -30);
        assert!(context.at_war());
        assert_eq!(
            context.recent_events(),
            ["Market burned down", "New levy announced"]
        );
        assert_eq!(context.npc_mood(), "Angry");
    }

    #[test]
    fn test_response_defaults() {
        let response = DialogueResponse::default();
        assert_eq!(response.text(), "");
        assert_eq!(response.emotion(), "Neutral");
        assert_eq!(response.intent(), DialogueIntent::Neutral);
        assert!(!response.end_conversation());
    }

    #[test]
    fn test_error_response_is_canonical() {
        let response = DialogueResponse::error("backend unavailable");
        assert_eq!(response.text(), "backend unavailable");
        assert_eq!(response.emotion(), "Confused");
        assert_eq!(response.intent(), DialogueIntent::Neutral);
        assert!(!response.end_conversation());
    }

    #[test]
    fn test_response_builders() {
        let response = DialogueResponse::new("Begone, outlander.")
            .with_emotion("Contempt")
            .with_intent(DialogueIntent::Dismissive)
            .with_end_conversation(true);
        assert_eq!(response.intent(), DialogueIntent::Dismissive);
        assert!(response.end_conversation());
    }
}
