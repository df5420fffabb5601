//! Config schema types (server, LINE channel, vision model, object storage, bot behaviour).

use std::time::Duration;

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FoodlensConfig {
    pub server: ServerConfig,
    pub line: LineSection,
    pub vision: VisionConfig,
    /// Absent when no bucket is configured; saving is then unavailable.
    pub storage: Option<StorageConfig>,
    pub bot: BotConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Path the LINE platform posts webhooks to.
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            webhook_path: "/line/webhook".into(),
        }
    }
}

/// LINE Messaging API channel.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LineSection {
    pub channel_access_token: Secret<String>,
    pub api_base: String,
    pub data_api_base: String,
    pub timeout_secs: u64,
}

impl LineSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LineSection {
    fn default() -> Self {
        Self {
            channel_access_token: Secret::new(String::new()),
            api_base: "https://api.line.me".into(),
            data_api_base: "https://api-data.line.me".into(),
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for LineSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSection")
            .field("channel_access_token", &redacted(&self.channel_access_token))
            .field("api_base", &self.api_base)
            .field("data_api_base", &self.data_api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Vision model used for food recognition.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    /// Deadline for one recognition call.
    pub timeout_secs: u64,
}

impl VisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// S3-compatible bucket for saved images.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: Secret<String>,
    /// Custom endpoint for S3-compatible services; enables path-style URLs.
    pub endpoint: Option<String>,
    pub key_prefix: String,
    pub upload_timeout_secs: u64,
}

impl StorageConfig {
    /// All four credentials/location fields are present.
    pub fn is_complete(&self) -> bool {
        !self.bucket.is_empty()
            && !self.region.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.expose_secret().is_empty()
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: String::new(),
            access_key_id: String::new(),
            secret_access_key: Secret::new(String::new()),
            endpoint: None,
            key_prefix: "food-images".into(),
            upload_timeout_secs: 15,
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("endpoint", &self.endpoint)
            .field("key_prefix", &self.key_prefix)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .finish()
    }
}

/// Conversation behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Case-insensitive substrings that trigger a save.
    pub save_keywords: Vec<String>,
    /// Deadline for re-downloading the original image when saving.
    pub save_fetch_timeout_secs: u64,
}

impl BotConfig {
    pub fn save_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.save_fetch_timeout_secs)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            save_keywords: vec!["save".into(), "儲存".into()],
            save_fetch_timeout_secs: 15,
        }
    }
}

fn redacted(secret: &Secret<String>) -> &'static str {
    if secret.expose_secret().is_empty() {
        "<unset>"
    } else {
        "[REDACTED]"
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = FoodlensConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.webhook_path, "/line/webhook");
        assert_eq!(cfg.vision.model, "gpt-4o-mini");
        assert_eq!(cfg.vision.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.bot.save_keywords, vec!["save", "儲存"]);
        assert_eq!(cfg.bot.save_fetch_timeout(), Duration::from_secs(15));
        assert!(cfg.storage.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: FoodlensConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [vision]
            api_key = "sk-test"

            [storage]
            bucket = "meals"
            region = "ap-northeast-1"
            access_key_id = "AKID"
            secret_access_key = "shh"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.vision.api_key.expose_secret(), "sk-test");
        let storage = cfg.storage.unwrap();
        assert!(storage.is_complete());
        assert_eq!(storage.key_prefix, "food-images");
        assert_eq!(storage.upload_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn debug_never_prints_secrets() {
        let cfg: FoodlensConfig = toml::from_str(
            r#"
            [line]
            channel_access_token = "line-secret-token"
            [vision]
            api_key = "sk-very-secret"
            "#,
        )
        .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("line-secret-token"));
        assert!(!dbg.contains("sk-very-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
