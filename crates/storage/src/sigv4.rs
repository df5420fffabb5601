//! AWS Signature Version 4 for S3, header and query-string flavours.
//!
//! See <https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-authenticating-requests.html>.

use std::time::Duration;

use {
    chrono::{DateTime, Utc},
    hmac::{Hmac, Mac},
    secrecy::{ExposeSecret, Secret},
    sha2::{Digest, Sha256},
};

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// Payload hash placeholder for presigned URLs.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Longest expiry S3 accepts for a presigned URL.
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Static access-key credentials.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: Secret<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// One request to sign. `path` must already be URI-encoded
/// (see [`encode_path`]).
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub path: &'a str,
    pub region: &'a str,
    pub now: DateTime<Utc>,
}

pub fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// URI-encode an object key, keeping `/` separators.
pub fn encode_path(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(Error::signing)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn short_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

fn scope(now: DateTime<Utc>, region: &str) -> String {
    format!("{}/{region}/{SERVICE}/aws4_request", short_date(now))
}

fn signing_key(secret: &Secret<String>, now: DateTime<Utc>, region: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(
        format!("AWS4{}", secret.expose_secret()).as_bytes(),
        short_date(now).as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn canonical_query(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns `(canonical_headers, signed_headers)`.
fn canonical_headers(headers: &[(&str, &str)]) -> (String, String) {
    let mut sorted: Vec<(String, &str)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical = sorted
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect::<String>();
    let signed = sorted
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");
    (canonical, signed)
}

fn signature(
    credentials: &Credentials,
    req: &SignableRequest<'_>,
    query: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> Result<String> {
    let canonical_request = format!(
        "{}\n{}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
        req.method, req.path
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        amz_date(req.now),
        scope(req.now, req.region),
        hex_sha256(canonical_request.as_bytes())
    );
    let key = signing_key(&credentials.secret_access_key, req.now, req.region)?;
    Ok(hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?))
}

/// Headers to attach to a header-signed request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Sign a request with the `Authorization` header scheme.
///
/// `extra_headers` are signed alongside `host`, `x-amz-content-sha256` and
/// `x-amz-date`, and must be sent verbatim.
pub fn sign_request(
    credentials: &Credentials,
    req: &SignableRequest<'_>,
    extra_headers: &[(&str, &str)],
    payload_hash: &str,
) -> Result<SignedHeaders> {
    let date = amz_date(req.now);
    let mut headers: Vec<(&str, &str)> = vec![
        ("host", req.host),
        ("x-amz-content-sha256", payload_hash),
        ("x-amz-date", date.as_str()),
    ];
    headers.extend_from_slice(extra_headers);
    let (canonical, signed) = canonical_headers(&headers);

    let sig = signature(credentials, req, "", &canonical, &signed, payload_hash)?;
    let authorization = format!(
        "{ALGORITHM} Credential={}/{},SignedHeaders={signed},Signature={sig}",
        credentials.access_key_id,
        scope(req.now, req.region)
    );

    Ok(SignedHeaders {
        authorization,
        amz_date: date,
        content_sha256: payload_hash.to_string(),
    })
}

/// Build a query-string presigned URL valid for `expires` (capped at seven
/// days, minimum one second).
pub fn presign_url(
    credentials: &Credentials,
    req: &SignableRequest<'_>,
    scheme: &str,
    expires: Duration,
) -> Result<String> {
    let expires = expires.clamp(Duration::from_secs(1), MAX_PRESIGN_EXPIRY);
    let params = vec![
        ("X-Amz-Algorithm".to_string(), ALGORITHM.to_string()),
        (
            "X-Amz-Credential".to_string(),
            format!(
                "{}/{}",
                credentials.access_key_id,
                scope(req.now, req.region)
            ),
        ),
        ("X-Amz-Date".to_string(), amz_date(req.now)),
        ("X-Amz-Expires".to_string(), expires.as_secs().to_string()),
        ("X-Amz-SignedHeaders".to_string(), "host".to_string()),
    ];
    let query = canonical_query(&params);
    let (canonical, signed) = canonical_headers(&[("host", req.host)]);

    let sig = signature(credentials, req, &query, &canonical, &signed, UNSIGNED_PAYLOAD)?;
    Ok(format!(
        "{scheme}://{}{}?{query}&X-Amz-Signature={sig}",
        req.host, req.path
    ))
}
