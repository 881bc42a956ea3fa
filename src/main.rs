use std::sync::Arc;

use chrono::{DateTime, Utc};
use config::Config;
use dotenvy::dotenv;
use slack::{verify::SignatureVerifier, MessageSender, SlackApp};
use tracing::{info, warn};

mod action;
mod command;
mod config;
mod error;
mod interaction;
mod router;
mod slack;

#[derive(Clone)]
pub struct ServerState {
    verifier: SignatureVerifier,
    slack: Arc<dyn MessageSender>,
    clock: fn() -> DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_result = dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("slack_events_bot=info".parse()?),
        )
        .init();

    match dotenv_result {
        Ok(_) => info!("Loaded .env file"),
        Err(_) => warn!(".env file not found, ignoring..."),
    }

    let config = Config::from_env()?;
    let state = ServerState {
        verifier: SignatureVerifier::from_config(&config),
        slack: Arc::new(SlackApp::new(&config)?),
        clock: Utc::now,
    };

    // Run axum server
    let server = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&server).await?;
    info!(
        address = %server,
        version = env!("CARGO_PKG_VERSION"),
        "Running Axum server"
    );
    axum::serve(listener, router::get_router().with_state(state)).await?;

    Ok(())
}
