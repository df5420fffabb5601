use std::time::Duration;

use {
    async_trait::async_trait,
    bytes::Bytes,
    chrono::Utc,
    reqwest::Url,
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    DEFAULT_KEY_PREFIX, DEFAULT_PRESIGN_TTL, Error, ObjectStore, Result, object_key,
    sigv4::{self, Credentials, SignableRequest},
};

/// Connection settings for an S3-compatible bucket.
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: Secret<String>,
    /// Custom endpoint (MinIO, LocalStack, ...). Switches to path-style URLs.
    pub endpoint: Option<String>,
    pub key_prefix: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("key_prefix", &self.key_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where an object lives on the wire.
struct ObjectLocation {
    scheme: String,
    host: String,
    path: String,
}

/// [`ObjectStore`] over the S3 REST API, signed with SigV4.
pub struct S3ObjectStore {
    config: S3Config,
    credentials: Credentials,
    client: reqwest::Client,
    /// Parsed `config.endpoint`, when set.
    endpoint: Option<Url>,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Result<Self> {
        if config.bucket.is_empty() || config.region.is_empty() || config.access_key_id.is_empty()
        {
            return Err(Error::not_configured(
                "bucket, region and access key are required",
            ));
        }
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(|e| Url::parse(e).map_err(|err| Error::invalid_endpoint(format!("{e}: {err}"))))
            .transpose()?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let credentials = Credentials {
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
        };
        Ok(Self {
            config,
            credentials,
            client,
            endpoint,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn key_prefix(&self) -> &str {
        if self.config.key_prefix.is_empty() {
            DEFAULT_KEY_PREFIX
        } else {
            &self.config.key_prefix
        }
    }

    fn locate(&self, key: &str) -> Result<ObjectLocation> {
        let encoded_key = sigv4::encode_path(key);
        match &self.endpoint {
            Some(url) => {
                let host = url
                    .host_str()
                    .ok_or_else(|| Error::invalid_endpoint(format!("{url}: missing host")))?;
                let host = match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                };
                let base = url.path().trim_end_matches('/');
                Ok(ObjectLocation {
                    scheme: url.scheme().to_string(),
                    host,
                    path: format!("{base}/{}/{encoded_key}", self.config.bucket),
                })
            },
            None => Ok(ObjectLocation {
                scheme: "https".into(),
                host: format!(
                    "{}.s3.{}.amazonaws.com",
                    self.config.bucket, self.config.region
                ),
                path: format!("/{encoded_key}"),
            }),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, user_id: &str, data: Bytes, content_type: &str) -> Result<String> {
        let now = Utc::now();
        let key = object_key(self.key_prefix(), user_id, now);
        let loc = self.locate(&key)?;
        let payload_hash = sigv4::hex_sha256(&data);

        let signed = sigv4::sign_request(
            &self.credentials,
            &SignableRequest {
                method: "PUT",
                host: &loc.host,
                path: &loc.path,
                region: &self.config.region,
                now,
            },
            &[("content-type", content_type)],
            &payload_hash,
        )?;

        debug!(bucket = %self.config.bucket, key = %key, bytes = data.len(), "s3 put object");

        let resp = self
            .client
            .put(format!("{}://{}{}", loc.scheme, loc.host, loc.path))
            .header("authorization", signed.authorization)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header("content-type", content_type)
            .body(data)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, bucket = %self.config.bucket, key = %key, "s3 put object failed");
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(key)
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String> {
        let ttl = if ttl.is_zero() {
            DEFAULT_PRESIGN_TTL
        } else {
            ttl
        };
        let loc = self.locate(key)?;
        sigv4::presign_url(
            &self.credentials,
            &SignableRequest {
                method: "GET",
                host: &loc.host,
                path: &loc.path,
                region: &self.config.region,
                now: Utc::now(),
            },
            &loc.scheme,
            ttl,
        )
    }
}
