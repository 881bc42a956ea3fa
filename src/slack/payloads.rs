//! Inbound Slack payloads and their decoders.
//!
//! Decoding is two-step: read the `type` discriminant first, then parse the
//! rest of the document into the matching typed payload.

use serde::Deserialize;
use serde_json::Value;

use super::verify::VerifiedBody;
use crate::error::DecodeError;

/// Top-level Events API payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    UrlVerification { challenge: String },
    CallbackEvent { inner: InnerEvent },
}

/// The `event` object of an `event_callback`.
#[derive(Debug, Clone, PartialEq)]
pub enum InnerEvent {
    AppMention(AppMention),
    /// Any other event type. Subscribed but ignored.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppMention {
    pub channel: String,
    #[serde(default)]
    pub user: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct UrlVerificationPayload {
    challenge: String,
}

#[derive(Debug, Deserialize)]
struct CallbackPayload {
    event: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    BlockActions,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InteractionCallback {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, rename = "actions")]
    pub block_actions: Vec<BlockAction>,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub channel: Option<SlackChannel>,
    #[serde(default)]
    pub user: Option<SlackUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackChannel {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackUser {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockAction {
    pub block_id: String,
    #[serde(default)]
    pub action_id: String,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

impl BlockAction {
    pub fn selected_value(&self) -> &str {
        self.selected_option
            .as_ref()
            .map(|o| o.value.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

fn discriminant(value: &Value) -> Result<&str, DecodeError> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::InvalidStructure("missing \"type\" field".to_string()))
}

/// Decodes an Events API request body.
pub fn decode_envelope(body: &VerifiedBody) -> Result<Envelope, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    let kind = discriminant(&value)?.to_string();

    match kind.as_str() {
        "url_verification" => {
            let payload: UrlVerificationPayload = serde_json::from_value(value)?;
            Ok(Envelope::UrlVerification {
                challenge: payload.challenge,
            })
        }
        "event_callback" => {
            let payload: CallbackPayload = serde_json::from_value(value)?;
            Ok(Envelope::CallbackEvent {
                inner: decode_inner_event(payload.event)?,
            })
        }
        other => Err(DecodeError::UnknownType(other.to_string())),
    }
}

fn decode_inner_event(event: Value) -> Result<InnerEvent, DecodeError> {
    let kind = discriminant(&event)?.to_string();

    match kind.as_str() {
        "app_mention" => Ok(InnerEvent::AppMention(serde_json::from_value(event)?)),
        other => Ok(InnerEvent::Other(other.to_string())),
    }
}

/// Decodes an interactivity request body: a form with the callback JSON
/// under `payload`.
pub fn decode_interaction(body: &VerifiedBody) -> Result<InteractionCallback, DecodeError> {
    let payload = form_urlencoded::parse(body)
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| DecodeError::InvalidStructure("missing \"payload\" field".to_string()))?;

    Ok(serde_json::from_str(&payload)?)
}
