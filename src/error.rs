//! Error types for the events bot.
//!
//! Each stage of request handling has its own error enum. [`HandlerError`]
//! collects them at the HTTP boundary and decides the status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Request signature verification failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or malformed header: {0}")]
    MissingOrMalformedHeader(&'static str),

    #[error("request timestamp is outside the allowed window")]
    StaleTimestamp,

    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Envelope decoding failures.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid payload structure: {0}")]
    InvalidStructure(String),

    /// A discriminant this bot does not handle. Treated as a no-op.
    #[error("unknown payload type: {0}")]
    UnknownType(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidStructure(err.to_string())
    }
}

/// Outbound message delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API error: {0}")]
    Api(String),
}

/// Command routing and interaction resolution failures.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("mention text needs at least two tokens")]
    TooFewTokens,

    #[error("interaction callback carries no actions")]
    NoActions,

    #[error("delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),

    #[error("invalid block template: {0}")]
    Template(#[from] serde_json::Error),
}

/// Anything that can end a request early.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Auth(AuthError::SignatureMismatch) => StatusCode::BAD_REQUEST,
            HandlerError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::Decode(DecodeError::UnknownType(_)) => StatusCode::OK,
            HandlerError::Decode(DecodeError::InvalidStructure(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HandlerError::Route(RouteError::TooFewTokens | RouteError::NoActions) => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::Route(RouteError::DeliveryFailed(_) | RouteError::Template(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if status.is_client_error() {
            warn!(error = %self, "request rejected");
        }
        status.into_response()
    }
}
