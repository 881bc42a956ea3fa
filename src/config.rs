use std::env;

use crate::error::ConfigError;

const DEFAULT_API_BASE: &str = "https://slack.com/api";
const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Process configuration, read once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub signing_secret: String,
    pub ip: String,
    pub port: u16,
    pub api_base: String,
    /// Maximum request age in seconds. `None` disables the freshness check.
    pub signature_tolerance: Option<i64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let tolerance = match lookup("SLACK_SIGNATURE_TOLERANCE_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| ConfigError::Invalid {
                    name: "SLACK_SIGNATURE_TOLERANCE_SECS",
                    reason: e.to_string(),
                })?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        Ok(Self {
            bot_token: required("SLACK_BOT_TOKEN")?,
            signing_secret: required("SLACK_SIGNING_SECRET")?,
            ip: lookup("IP").unwrap_or("0.0.0.0".to_string()),
            port,
            api_base: lookup("SLACK_API_BASE").unwrap_or(DEFAULT_API_BASE.to_string()),
            signature_tolerance: (tolerance > 0).then_some(tolerance),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
