use {async_trait::async_trait, bytes::Bytes};

use crate::Result;

/// Raw media downloaded from the messaging platform.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub data: Bytes,
    /// `Content-Type` reported by the platform, if any.
    pub content_type: Option<String>,
}

impl FetchedContent {
    /// Content type, defaulting to JPEG when the platform did not say.
    pub fn content_type_or_jpeg(&self) -> &str {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or("image/jpeg")
    }
}

/// Send the single reply an inbound event allows.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()>;
}

/// Download the original bytes behind a content reference.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, content_id: &str) -> Result<FetchedContent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_defaults_to_jpeg() {
        let c = FetchedContent {
            data: Bytes::from_static(b"x"),
            content_type: None,
        };
        assert_eq!(c.content_type_or_jpeg(), "image/jpeg");
        let c = FetchedContent {
            data: Bytes::new(),
            content_type: Some(" ".into()),
        };
        assert_eq!(c.content_type_or_jpeg(), "image/jpeg");
        let c = FetchedContent {
            data: Bytes::new(),
            content_type: Some("image/png".into()),
        };
        assert_eq!(c.content_type_or_jpeg(), "image/png");
    }
}
