use std::time::Duration;

use secrecy::{ExposeSecret, Secret};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_DATA_API_BASE: &str = "https://api-data.line.me";

/// Credentials and endpoints for one LINE bot channel.
#[derive(Clone)]
pub struct LineConfig {
    /// Long-lived channel access token.
    pub channel_access_token: Secret<String>,
    /// Base URL for the messaging API (replies).
    pub api_base: String,
    /// Base URL for the data API (message content).
    pub data_api_base: String,
    pub timeout: Duration,
}

impl LineConfig {
    pub fn new(channel_access_token: Secret<String>) -> Self {
        Self {
            channel_access_token,
            ..Self::default()
        }
    }

    pub fn has_token(&self) -> bool {
        !self.channel_access_token.expose_secret().is_empty()
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: Secret::new(String::new()),
            api_base: DEFAULT_API_BASE.into(),
            data_api_base: DEFAULT_DATA_API_BASE.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_access_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("data_api_base", &self.data_api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}
