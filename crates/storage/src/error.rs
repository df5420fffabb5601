#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object store is not configured: {message}")]
    NotConfigured { message: String },

    #[error("invalid storage endpoint: {message}")]
    InvalidEndpoint { message: String },

    #[error("request signing failed: {message}")]
    Signing { message: String },

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-2xx answer from the object store.
    #[error("object store returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl Error {
    #[must_use]
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn signing(message: impl std::fmt::Display) -> Self {
        Self::Signing {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
