#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vision API key is not configured")]
    MissingApiKey,

    #[error("vision request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-2xx answer from the endpoint.
    #[error("vision API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse vision response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
