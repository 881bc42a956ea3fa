use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Response,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    action::Content,
    config::Config,
    error::{ConfigError, DeliveryError},
};

pub mod block;
pub mod payloads;
pub mod verify;

/// The outbound half of the bot: everything a response action can do.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn post_message(&self, channel: &str, content: &Content) -> Result<(), DeliveryError>;

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        content: &Content,
    ) -> Result<(), DeliveryError>;

    async fn delete_original(&self, response_url: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackApp {
    client: reqwest::Client,
    api_base: String,
}

impl SlackApp {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", config.bot_token)
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: "SLACK_BOT_TOKEN",
                    reason: "not a valid header value".to_string(),
                })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Invalid {
                name: "SLACK_BOT_TOKEN",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn validate_slack(&self, response: Response) -> Result<(), DeliveryError> {
        let data: SlackApiResponse = response.error_for_status()?.json().await?;

        if !data.ok {
            let error = data.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!(error = %error, "Slack API Error!");
            return Err(DeliveryError::Api(error));
        }

        Ok(())
    }

    async fn call(&self, method: &str, body: &Value) -> Result<(), DeliveryError> {
        let res = self
            .client
            .post(format!("{}/{}", self.api_base, method))
            .json(body)
            .send()
            .await?;

        self.validate_slack(res).await
    }
}

#[async_trait]
impl MessageSender for SlackApp {
    async fn post_message(&self, channel: &str, content: &Content) -> Result<(), DeliveryError> {
        debug!(channel, "Posting message");
        self.call("chat.postMessage", &message_body(channel, None, content))
            .await
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        content: &Content,
    ) -> Result<(), DeliveryError> {
        debug!(channel, user, "Posting ephemeral message");
        self.call(
            "chat.postEphemeral",
            &message_body(channel, Some(user), content),
        )
        .await
    }

    async fn delete_original(&self, response_url: &str) -> Result<(), DeliveryError> {
        debug!("Deleting original message");
        // Response URLs answer with plain text, not the Web API envelope.
        self.client
            .post(response_url)
            .json(&json!({ "delete_original": true }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

fn message_body(channel: &str, user: Option<&str>, content: &Content) -> Value {
    let mut body = json!({ "channel": channel });
    if let Some(user) = user {
        body["user"] = Value::String(user.to_string());
    }

    match content {
        Content::Text(text) => body["text"] = Value::String(text.clone()),
        Content::Blocks { blocks, fallback } => {
            body["blocks"] = Value::Array(blocks.clone());
            if let Some(fallback) = fallback {
                body["text"] = Value::String(fallback.clone());
            }
        }
    }

    body
}

#[cfg(test)]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Sent {
        Message(String, Content),
        Ephemeral(String, String, Content),
        Delete(String),
    }

    /// Records every call in order. A failing sender records too, then errors.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSender {
        sent: Arc<Mutex<Vec<Sent>>>,
        fail: bool,
    }

    impl RecordingSender {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn record(&self, sent: Sent) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(sent);
            if self.fail {
                return Err(DeliveryError::Api("channel_not_found".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn post_message(
            &self,
            channel: &str,
            content: &Content,
        ) -> Result<(), DeliveryError> {
            self.record(Sent::Message(channel.to_string(), content.clone()))
        }

        async fn post_ephemeral(
            &self,
            channel: &str,
            user: &str,
            content: &Content,
        ) -> Result<(), DeliveryError> {
            self.record(Sent::Ephemeral(
                channel.to_string(),
                user.to_string(),
                content.clone(),
            ))
        }

        async fn delete_original(&self, response_url: &str) -> Result<(), DeliveryError> {
            self.record(Sent::Delete(response_url.to_string()))
        }
    }
}
