use serde::{Deserialize, Serialize};

/// Stand-in for a sender the platform did not identify.
pub const UNKNOWN_USER_ID: &str = "unknown";

/// A verified event handed over by a webhook-ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Sender identity, never empty.
    pub user_id: String,
    /// Single-use token addressing exactly one reply to this event.
    pub reply_token: String,
    pub payload: EventPayload,
}

/// What the event carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Text { text: String },
    /// An uploaded image, referenced by the platform's opaque content ID.
    Image { content_id: String },
    /// Anything else (stickers, follows, postbacks, ...).
    Other { kind: String },
}

impl InboundEvent {
    /// Build an event, normalizing an absent or empty sender to
    /// [`UNKNOWN_USER_ID`].
    pub fn new(
        user_id: Option<&str>,
        reply_token: impl Into<String>,
        payload: EventPayload,
    ) -> Self {
        let user_id = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_USER_ID)
            .to_string();
        Self {
            user_id,
            reply_token: reply_token.into(),
            payload,
        }
    }

    pub fn text(user_id: Option<&str>, reply_token: impl Into<String>, text: &str) -> Self {
        Self::new(user_id, reply_token, EventPayload::Text {
            text: text.to_string(),
        })
    }

    pub fn image(
        user_id: Option<&str>,
        reply_token: impl Into<String>,
        content_id: impl Into<String>,
    ) -> Self {
        Self::new(user_id, reply_token, EventPayload::Image {
            content_id: content_id.into(),
        })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &str {
        match &self.payload {
            EventPayload::Text { .. } => "text",
            EventPayload::Image { .. } => "image",
            EventPayload::Other { kind } => kind,
        }
    }
}
