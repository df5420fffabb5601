use std::time::Duration;

use {
    async_trait::async_trait,
    base64::{Engine, engine::general_purpose::STANDARD},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
};

use crate::{
    Error, FoodRecognizer, RecognitionResult, Result, prompt::RECOGNITION_PROMPT,
    response::ResponsesBody,
};

/// Recognizer backed by the OpenAI Responses API.
pub struct OpenAiRecognizer {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiRecognizer {
    /// `timeout` bounds each HTTP exchange; callers may impose a tighter
    /// deadline of their own.
    pub fn new(
        api_key: Secret<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, jpeg: &[u8]) -> serde_json::Value {
        let image_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg));
        serde_json::json!({
            "model": self.model,
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": RECOGNITION_PROMPT },
                    { "type": "input_image", "image_url": image_url },
                ],
            }],
        })
    }
}

#[async_trait]
impl FoodRecognizer for OpenAiRecognizer {
    async fn recognize(&self, jpeg: &[u8]) -> Result<RecognitionResult> {
        if self.api_key.expose_secret().is_empty() {
            return Err(Error::MissingApiKey);
        }

        debug!(model = %self.model, bytes = jpeg.len(), "vision recognize request");

        let resp = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(jpeg))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, model = %self.model, "vision API error");
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        let parsed: ResponsesBody = serde_json::from_str(&raw)?;
        Ok(RecognitionResult::from_text(parsed.text().unwrap_or_default()))
    }
}
