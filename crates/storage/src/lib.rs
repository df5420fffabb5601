//! Durable object storage for saved food images.

pub mod error;
pub mod s3;
pub mod sigv4;

use std::time::Duration;

use {
    async_trait::async_trait,
    bytes::Bytes,
    chrono::{DateTime, Utc},
};

pub use {
    error::{Error, Result},
    s3::{S3Config, S3ObjectStore},
};

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "food-images";

/// Presigned URLs default to one hour.
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(60 * 60);

/// Upload raw bytes and hand out time-limited read URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` for `user_id` and return the object key.
    ///
    /// Keys from [`object_key`] are second-granular, so a second upload for
    /// the same user within one second overwrites the first.
    async fn upload(&self, user_id: &str, data: Bytes, content_type: &str) -> Result<String>;

    /// Mint a credential-free GET URL for `key`, valid for `ttl`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String>;
}

/// `{prefix}/{user_id}/{YYYYMMDD_HHMMSS}.jpg`
///
/// Keys are second-granular; two uploads for one user within the same second
/// share a key.
pub fn object_key(prefix: &str, user_id: &str, at: DateTime<Utc>) -> String {
    let user_id = if user_id.is_empty() {
        "unknown"
    } else {
        user_id
    };
    let prefix = prefix.trim_matches('/');
    format!("{prefix}/{user_id}/{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    #[test]
    fn key_layout() {
        let at = Utc.with_ymd_and_hms(2026, 2, 18, 11, 13, 36).unwrap();
        assert_eq!(
            object_key(DEFAULT_KEY_PREFIX, "U80b35e04", at),
            "food-images/U80b35e04/20260218_111336.jpg"
        );
    }

    #[test]
    fn empty_user_is_unknown() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            object_key("food-images/", "", at),
            "food-images/unknown/20260102_030405.jpg"
        );
    }

    #[test]
    fn same_second_uploads_share_a_key() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let same_second = at + chrono::Duration::milliseconds(900);
        assert_eq!(
            object_key(DEFAULT_KEY_PREFIX, "U1", at),
            object_key(DEFAULT_KEY_PREFIX, "U1", same_second)
        );
    }

    #[test]
    fn keys_differ_across_seconds() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let later = at + chrono::Duration::seconds(1);
        assert_ne!(
            object_key(DEFAULT_KEY_PREFIX, "U1", at),
            object_key(DEFAULT_KEY_PREFIX, "U1", later)
        );
    }
}
