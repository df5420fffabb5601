//! Overlay of well-known deployment environment variables.
//!
//! | Variable | Field |
//! |---|---|
//! | `LINE_CHANNEL_ACCESS_TOKEN` | `line.channel_access_token` |
//! | `OPEN_AI_TOKEN` | `vision.api_key` |
//! | `OPENAI_IMAGE_MODEL` | `vision.model` |
//! | `AWS_S3_BUCKET_NAME` | `storage.bucket` |
//! | `AWS_S3_REGION` | `storage.region` |
//! | `AWS_S3_ACCESS_KEY_ID` | `storage.access_key_id` |
//! | `AWS_S3_SECRET_ACCESS_KEY` | `storage.secret_access_key` |
//! | `PORT` | `server.port` |

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::schema::{FoodlensConfig, StorageConfig};

/// Apply variables from the process environment.
pub fn apply_env_overrides(config: &mut FoodlensConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Apply variables using a custom lookup. Empty values are ignored.
///
/// Storage is dropped entirely when the result is incomplete, so a half
/// configured bucket reads as "not configured" rather than failing later.
pub fn apply_env_overrides_with(
    config: &mut FoodlensConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get("LINE_CHANNEL_ACCESS_TOKEN") {
        config.line.channel_access_token = Secret::new(token);
    }
    if let Some(key) = get("OPEN_AI_TOKEN") {
        config.vision.api_key = Secret::new(key);
    }
    if let Some(model) = get("OPENAI_IMAGE_MODEL") {
        config.vision.model = model;
    }
    if let Some(port) = get("PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(port = %port, error = %e, "ignoring invalid PORT"),
        }
    }

    let bucket = get("AWS_S3_BUCKET_NAME");
    let region = get("AWS_S3_REGION");
    let access_key_id = get("AWS_S3_ACCESS_KEY_ID");
    let secret_access_key = get("AWS_S3_SECRET_ACCESS_KEY");
    let any_storage_var = bucket.is_some()
        || region.is_some()
        || access_key_id.is_some()
        || secret_access_key.is_some();

    if any_storage_var {
        let storage = config.storage.get_or_insert_with(StorageConfig::default);
        if let Some(v) = bucket {
            storage.bucket = v;
        }
        if let Some(v) = region {
            storage.region = v;
        }
        if let Some(v) = access_key_id {
            storage.access_key_id = v;
        }
        if let Some(v) = secret_access_key {
            storage.secret_access_key = Secret::new(v);
        }
    }

    if config.storage.as_ref().is_some_and(|s| !s.is_complete()) {
        debug!("object storage settings incomplete, saving disabled");
        config.storage = None;
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::collections::HashMap};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn credentials_from_env() {
        let mut cfg = FoodlensConfig::default();
        apply_env_overrides_with(
            &mut cfg,
            lookup(&[
                ("LINE_CHANNEL_ACCESS_TOKEN", "line-tok"),
                ("OPEN_AI_TOKEN", "sk-1"),
                ("OPENAI_IMAGE_MODEL", "gpt-4.1-mini"),
            ]),
        );
        assert_eq!(cfg.line.channel_access_token.expose_secret(), "line-tok");
        assert_eq!(cfg.vision.api_key.expose_secret(), "sk-1");
        assert_eq!(cfg.vision.model, "gpt-4.1-mini");
    }

    #[test]
    fn complete_storage_from_env() {
        let mut cfg = FoodlensConfig::default();
        apply_env_overrides_with(
            &mut cfg,
            lookup(&[
                ("AWS_S3_BUCKET_NAME", "meals"),
                ("AWS_S3_REGION", "ap-northeast-1"),
                ("AWS_S3_ACCESS_KEY_ID", "AKID"),
                ("AWS_S3_SECRET_ACCESS_KEY", "shh"),
            ]),
        );
        let storage = cfg.storage.unwrap();
        assert_eq!(storage.bucket, "meals");
        assert_eq!(storage.secret_access_key.expose_secret(), "shh");
    }

    #[test]
    fn incomplete_storage_is_dropped() {
        let mut cfg = FoodlensConfig::default();
        apply_env_overrides_with(
            &mut cfg,
            lookup(&[("AWS_S3_BUCKET_NAME", "meals"), ("AWS_S3_REGION", "")]),
        );
        assert!(cfg.storage.is_none());
    }

    #[test]
    fn env_overrides_single_storage_field() {
        let mut cfg: FoodlensConfig = toml::from_str(
            r#"
            [storage]
            bucket = "from-file"
            region = "us-east-1"
            access_key_id = "AKID"
            secret_access_key = "shh"
            "#,
        )
        .unwrap();
        apply_env_overrides_with(&mut cfg, lookup(&[("AWS_S3_BUCKET_NAME", "from-env")]));
        let storage = cfg.storage.unwrap();
        assert_eq!(storage.bucket, "from-env");
        assert_eq!(storage.region, "us-east-1");
    }

    #[test]
    fn port_from_env() {
        let mut cfg = FoodlensConfig::default();
        apply_env_overrides_with(&mut cfg, lookup(&[("PORT", "8002")]));
        assert_eq!(cfg.server.port, 8002);

        apply_env_overrides_with(&mut cfg, lookup(&[("PORT", "not-a-port")]));
        assert_eq!(cfg.server.port, 8002);
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut cfg = FoodlensConfig::default();
        apply_env_overrides_with(&mut cfg, lookup(&[("OPENAI_IMAGE_MODEL", "  ")]));
        assert_eq!(cfg.vision.model, "gpt-4o-mini");
    }
}
