use serde_json::Value;
use tracing::debug;

use crate::{error::DeliveryError, slack::MessageSender};

/// Message body: plain text or Block Kit blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Blocks {
        blocks: Vec<Value>,
        /// Shown by clients that cannot render blocks.
        fallback: Option<String>,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn blocks(blocks: Vec<Value>) -> Self {
        Self::Blocks {
            blocks,
            fallback: None,
        }
    }
}

/// An outbound effect decided by the router or the interaction resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseAction {
    PostMessage {
        channel: String,
        content: Content,
    },
    PostEphemeral {
        channel: String,
        user: String,
        content: Content,
    },
    DeleteOriginal {
        response_url: String,
    },
    NoOp,
}

impl ResponseAction {
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseAction::PostMessage { .. } => "post_message",
            ResponseAction::PostEphemeral { .. } => "post_ephemeral",
            ResponseAction::DeleteOriginal { .. } => "delete_original",
            ResponseAction::NoOp => "noop",
        }
    }
}

/// Executes one action against the outbound capability.
pub async fn dispatch(
    sender: &dyn MessageSender,
    action: &ResponseAction,
) -> Result<(), DeliveryError> {
    debug!(kind = action.kind(), "Dispatching response action");
    match action {
        ResponseAction::PostMessage { channel, content } => {
            sender.post_message(channel, content).await
        }
        ResponseAction::PostEphemeral {
            channel,
            user,
            content,
        } => sender.post_ephemeral(channel, user, content).await,
        ResponseAction::DeleteOriginal { response_url } => {
            sender.delete_original(response_url).await
        }
        ResponseAction::NoOp => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::testing::{RecordingSender, Sent};

    #[tokio::test]
    async fn test_should_preserve_addressing_and_content() {
        let sender = RecordingSender::default();
        let blocks = Content::Blocks {
            blocks: vec![serde_json::json!({"type": "divider"})],
            fallback: Some("fallback".to_string()),
        };

        dispatch(
            &sender,
            &ResponseAction::PostEphemeral {
                channel: "C1".to_string(),
                user: "U1".to_string(),
                content: blocks.clone(),
            },
        )
        .await
        .unwrap();
        dispatch(
            &sender,
            &ResponseAction::PostMessage {
                channel: "C2".to_string(),
                content: Content::text("pong"),
            },
        )
        .await
        .unwrap();
        dispatch(
            &sender,
            &ResponseAction::DeleteOriginal {
                response_url: "https://hooks.slack.com/actions/x".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            sender.sent(),
            vec![
                Sent::Ephemeral("C1".to_string(), "U1".to_string(), blocks),
                Sent::Message("C2".to_string(), Content::text("pong")),
                Sent::Delete("https://hooks.slack.com/actions/x".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_should_skip_noop() {
        let sender = RecordingSender::default();
        dispatch(&sender, &ResponseAction::NoOp).await.unwrap();
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_should_surface_delivery_failure() {
        let sender = RecordingSender::failing();
        let err = dispatch(
            &sender,
            &ResponseAction::PostMessage {
                channel: "C1".to_string(),
                content: Content::text("pong"),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DeliveryError::Api(_)));
    }
}
