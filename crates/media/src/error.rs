#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unsupported or corrupt source image.
    #[error("failed to decode image: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read image: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[must_use]
    pub fn decode(source: image::ImageError) -> Self {
        Self::Decode { source }
    }

    #[must_use]
    pub fn encode(source: image::ImageError) -> Self {
        Self::Encode { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
