use std::error::Error as StdError;

use crate::replies;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Failures recovered at the per-event handler boundary.
///
/// None of these are retried; each ends the workflow for its event.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("failed to fetch content: {0}")]
    Fetch(#[source] BoxError),

    /// Unsupported or corrupt image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] BoxError),

    /// Network, timeout, non-2xx or unparseable response.
    #[error("food recognition failed: {0}")]
    Recognition(#[source] BoxError),

    #[error("object storage is not configured")]
    StorageUnavailable,

    #[error("upload failed: {0}")]
    Upload(#[source] BoxError),

    /// Terminal for the event; there is nobody left to tell.
    #[error("reply failed: {0}")]
    Reply(#[source] BoxError),
}

/// Which workflow a failure happened in. A fetch failure reads differently
/// to the user depending on whether they were uploading or saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Recognize,
    Save,
}

impl HandlerError {
    #[must_use]
    pub fn fetch(source: impl Into<BoxError>) -> Self {
        Self::Fetch(source.into())
    }

    #[must_use]
    pub fn decode(source: impl Into<BoxError>) -> Self {
        Self::Decode(source.into())
    }

    #[must_use]
    pub fn recognition(source: impl Into<BoxError>) -> Self {
        Self::Recognition(source.into())
    }

    #[must_use]
    pub fn upload(source: impl Into<BoxError>) -> Self {
        Self::Upload(source.into())
    }

    #[must_use]
    pub fn reply(source: impl Into<BoxError>) -> Self {
        Self::Reply(source.into())
    }

    /// Short label used as the `stage` log field.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Recognition(_) => "recognition",
            Self::StorageUnavailable => "storage",
            Self::Upload(_) => "upload",
            Self::Reply(_) => "reply",
        }
    }

    /// Text to send back to the user, if a reply is still possible.
    pub fn user_message(&self, workflow: Workflow) -> Option<&'static str> {
        match (self, workflow) {
            (Self::Fetch(_), Workflow::Recognize) => Some(replies::FETCH_FAILED),
            (Self::Fetch(_), Workflow::Save) | (Self::Upload(_), _) => Some(replies::UPLOAD_FAILED),
            (Self::Decode(_), _) => Some(replies::DECODE_FAILED),
            (Self::Recognition(_), _) => Some(replies::RECOGNITION_FAILED),
            (Self::StorageUnavailable, _) => Some(replies::STORAGE_UNAVAILABLE),
            (Self::Reply(_), _) => None,
        }
    }
}
