//! Semantic checks on a loaded configuration.

use secrecy::ExposeSecret;

use crate::schema::FoodlensConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "vision.api_key"
    pub path: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    fn warning(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

/// Check `config` for values that would make the bot misbehave.
///
/// Missing credentials are warnings: the server still starts, and the
/// affected step fails per event with a user-facing message.
pub fn validate(config: &FoodlensConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if config.server.port == 0 {
        out.push(Diagnostic::error("server.port", "port must be non-zero"));
    }
    if !config.server.webhook_path.starts_with('/') {
        out.push(Diagnostic::error(
            "server.webhook_path",
            format!("must start with '/': {:?}", config.server.webhook_path),
        ));
    }
    if config.line.channel_access_token.expose_secret().is_empty() {
        out.push(Diagnostic::warning(
            "line.channel_access_token",
            "not set; replies and image downloads will fail",
        ));
    }
    if config.vision.api_key.expose_secret().is_empty() {
        out.push(Diagnostic::warning(
            "vision.api_key",
            "not set; food recognition will fail",
        ));
    }
    if config.vision.timeout_secs == 0 {
        out.push(Diagnostic::error("vision.timeout_secs", "must be non-zero"));
    }
    if config.line.timeout_secs == 0 {
        out.push(Diagnostic::error("line.timeout_secs", "must be non-zero"));
    }
    if config.bot.save_fetch_timeout_secs == 0 {
        out.push(Diagnostic::error(
            "bot.save_fetch_timeout_secs",
            "must be non-zero",
        ));
    }
    if config.bot.save_keywords.iter().all(|k| k.trim().is_empty()) {
        out.push(Diagnostic::warning(
            "bot.save_keywords",
            "no save keywords; images can never be saved",
        ));
    }
    match &config.storage {
        None => out.push(Diagnostic::warning(
            "storage",
            "object storage not configured; save requests will be declined",
        )),
        Some(storage) if storage.upload_timeout_secs == 0 => out.push(Diagnostic::error(
            "storage.upload_timeout_secs",
            "must be non-zero",
        )),
        Some(_) => {},
    }

    out
}
