//! Dialogue exchange use case.
//!
//! Parallel to the action pipeline but independent of it: an NPC identity,
//! the player's utterance, and a context snapshot go to the dialogue backend
//! and a response comes back. The production path never surfaces a fault -
//! any backend failure degrades into the canonical error response so the
//! conversation UI keeps flowing.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use npcmind_domain::{AgentId, DialogueContext, DialogueResponse};

use crate::infrastructure::ports::DialoguePort;

/// Free-form conversation between the player and one NPC.
pub struct DialogueExchange {
    backend: Arc<dyn DialoguePort>,
}

impl DialogueExchange {
    pub fn new(backend: Arc<dyn DialoguePort>) -> Self {
        Self { backend }
    }

    /// Generate the NPC's reply to one player utterance.
    ///
    /// Infallible by contract: backend faults are logged and converted to
    /// [`DialogueResponse::error`].
    pub async fn converse(
        &self,
        npc_id: AgentId,
        npc_name: &str,
        npc_role: &str,
        player_message: &str,
        context: DialogueContext,
        cancel: CancellationToken,
    ) -> DialogueResponse {
        let result = self
            .backend
            .generate_response(
                npc_id.clone(),
                npc_name.to_string(),
                npc_role.to_string(),
                player_message.to_string(),
                context,
                cancel,
            )
            .await;

        match result {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    npc_id = %npc_id,
                    error = %error,
                    "Dialogue backend failed, degrading to error response"
                );
                DialogueResponse::error(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npcmind_domain::DialogueIntent;

    use crate::infrastructure::ports::{DialogueError, MockDialoguePort};

    fn npc_id() -> AgentId {
        AgentId::new("merchant_7").expect("valid id")
    }

    #[tokio::test]
    async fn test_backend_response_passes_through() {
        let mut backend = MockDialoguePort::new();
        backend.expect_generate_response().returning(|_, _, _, _, _, _| {
            Ok(DialogueResponse::new("Fine wares, fair prices!")
                .with_emotion("Cheerful")
                .with_intent(DialogueIntent::Bargaining))
        });

        let exchange = DialogueExchange::new(Arc::new(backend));
        let response = exchange
            .converse(
                npc_id(),
                "Tahir",
                "Merchant",
                "What do you sell?",
                DialogueContext::new(),
                CancellationToken::new(),
            )
            .await;

        assert_eq!(response.text(), "Fine wares, fair prices!");
        assert_eq!(response.intent(), DialogueIntent::Bargaining);
    }

    #[tokio::test]
    async fn test_backend_fault_degrades_to_error_response() {
        let mut backend = MockDialoguePort::new();
        backend.expect_generate_response().returning(|_, _, _, _, _, _| {
            Err(DialogueError::RequestFailed("model timed out".into()))
        });

        let exchange = DialogueExchange::new(Arc::new(backend));
        let response = exchange
            .converse(
                npc_id(),
                "Tahir",
                "Merchant",
                "What do you sell?",
                DialogueContext::new(),
                CancellationToken::new(),
            )
            .await;

        assert_eq!(
            response.text(),
            "Dialogue request failed: model timed out"
        );
        assert_eq!(response.emotion(), "Confused");
        assert_eq!(response.intent(), DialogueIntent::Neutral);
        assert!(!response.end_conversation());
    }
}
