//! LINE webhook payloads.
//!
//! Only the fields the bot acts on are modelled; everything else is ignored.

use {
    foodlens_channels::{EventPayload, InboundEvent, Result},
    serde::Deserialize,
    tracing::debug,
};

/// Top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    /// Bot user ID the events were sent to.
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: Option<WebhookMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: String,
    pub text: Option<String>,
}

impl WebhookEvent {
    /// Convert to a channel event. Events without a reply token cannot be
    /// answered and yield `None`.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        let Some(reply_token) = self.reply_token.filter(|t| !t.is_empty()) else {
            debug!(event_type = %self.event_type, "dropping LINE event without reply token");
            return None;
        };
        let user_id = self.source.as_ref().and_then(|s| s.user_id.as_deref());

        let payload = match (self.event_type.as_str(), self.message) {
            ("message", Some(message)) => match message.message_type.as_str() {
                "text" => EventPayload::Text {
                    text: message.text.unwrap_or_default(),
                },
                "image" => EventPayload::Image {
                    content_id: message.id,
                },
                other => EventPayload::Other {
                    kind: format!("message:{other}"),
                },
            },
            (other, _) => EventPayload::Other {
                kind: other.to_string(),
            },
        };

        Some(InboundEvent::new(user_id, reply_token, payload))
    }
}

/// Parse a raw webhook body into the events the bot can reply to.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<InboundEvent>> {
    let body: WebhookBody = serde_json::from_slice(body)?;
    debug!(
        destination = %body.destination,
        events = body.events.len(),
        "parsed LINE webhook"
    );
    Ok(body
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_inbound)
        .collect())
}
