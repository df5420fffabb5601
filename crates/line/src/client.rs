use {
    async_trait::async_trait,
    foodlens_channels::{ContentFetcher, Error, FetchedContent, ReplySink, Result},
    secrecy::ExposeSecret,
    tracing::{debug, warn},
};

use crate::config::LineConfig;

/// LINE caps a text message at 5000 characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// HTTP client for the LINE messaging and data APIs.
pub struct LineClient {
    config: LineConfig,
    http: reqwest::Client,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::external("build LINE HTTP client", e))?;
        Ok(Self { config, http })
    }

    fn token(&self) -> Result<&str> {
        let token = self.config.channel_access_token.expose_secret();
        if token.is_empty() {
            return Err(Error::unavailable("LINE channel access token is not set"));
        }
        Ok(token)
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::status(status.as_u16(), body))
}

#[async_trait]
impl ReplySink for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()> {
        if reply_token.is_empty() {
            return Err(Error::invalid_input("empty reply token"));
        }
        let token = self.token()?;
        let payload = serde_json::json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": truncate_chars(text, MAX_TEXT_CHARS) }],
        });

        let resp = self
            .http
            .post(format!(
                "{}/v2/bot/message/reply",
                self.config.api_base.trim_end_matches('/')
            ))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::external("send LINE reply", e))?;
        if let Err(e) = error_for_status(resp).await {
            warn!(error = %e, "LINE reply rejected");
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl ContentFetcher for LineClient {
    async fn fetch(&self, content_id: &str) -> Result<FetchedContent> {
        if content_id.is_empty() {
            return Err(Error::invalid_input("empty content id"));
        }
        let token = self.token()?;
        let url = format!(
            "{}/v2/bot/message/{}/content",
            self.config.data_api_base.trim_end_matches('/'),
            urlencoding::encode(content_id)
        );

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::external("fetch LINE content", e))?;
        let resp = error_for_status(resp).await?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let data = resp
            .bytes()
            .await
            .map_err(|e| Error::external("read LINE content", e))?;

        debug!(content_id, bytes = data.len(), content_type = ?content_type, "fetched LINE content");
        Ok(FetchedContent { data, content_type })
    }
}
