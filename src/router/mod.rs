use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{debug, info, warn};

use crate::{
    action::dispatch,
    command,
    error::{DecodeError, HandlerError, RouteError},
    interaction,
    slack::payloads::{decode_envelope, decode_interaction, Envelope, InnerEvent},
    ServerState,
};

pub fn get_router() -> Router<ServerState> {
    Router::new()
        .route("/", get(root))
        .route("/slack/events", post(events))
        .route("/slack/actions", post(actions))
}

async fn root() -> &'static str {
    "Hello, Slack Events Bot!"
}

async fn events(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HandlerError> {
    let body = state
        .verifier
        .verify(&headers, body, (state.clock)().timestamp())?;

    let envelope = match decode_envelope(&body) {
        Ok(envelope) => envelope,
        Err(DecodeError::UnknownType(kind)) => {
            debug!(kind = %kind, "Ignoring unknown envelope type");
            return Ok(StatusCode::OK.into_response());
        }
        Err(err) => return Err(err.into()),
    };

    match envelope {
        Envelope::UrlVerification { challenge } => {
            info!("Answering URL verification challenge");
            Ok(([(CONTENT_TYPE, "text/plain")], challenge).into_response())
        }
        Envelope::CallbackEvent {
            inner: InnerEvent::AppMention(event),
        } => {
            let action = command::route(&event)?;
            info!(channel = %event.channel, kind = action.kind(), "Handling mention");
            dispatch(state.slack.as_ref(), &action)
                .await
                .map_err(RouteError::from)?;
            Ok(StatusCode::OK.into_response())
        }
        Envelope::CallbackEvent {
            inner: InnerEvent::Other(kind),
        } => {
            debug!(kind = %kind, "Ignoring event");
            Ok(StatusCode::OK.into_response())
        }
    }
}

async fn actions(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let now = (state.clock)();
    let body = state.verifier.verify(&headers, body, now.timestamp())?;
    let callback = decode_interaction(&body)?;

    // Delivery failures here are logged only; Slack just needs the ack.
    for action in interaction::resolve(&callback, now)? {
        if let Err(err) = dispatch(state.slack.as_ref(), &action).await {
            warn!(error = %err, kind = action.kind(), "Failed to deliver response action");
        }
    }

    Ok(StatusCode::OK)
}
