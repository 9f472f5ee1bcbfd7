use std::collections::BTreeMap;

use {
    base64::Engine,
    chrono::{DateTime, Utc},
    hmac::{Hmac, Mac},
    secrecy::ExposeSecret,
    sha2::Sha256,
};

use crate::{
    encode::{encode_param, encode_signature},
    error::{Error, Result},
    publisher::SnsTarget,
};

type HmacSha256 = Hmac<Sha256>;

/// Timestamp layout; milliseconds are always `.000`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Notification body: `who - message`.
pub fn format_body(who: &str, message: &str) -> String {
    format!("{who} - {message}")
}

/// A fully signed publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Sorted, percent-encoded `key=value&...` string.
    pub canonical_query: String,
    /// Base64 signature, before URL encoding.
    pub signature: String,
    /// `http://{endpoint}/?{canonical_query}&Signature={encoded signature}`.
    pub url: String,
}

impl SignedRequest {
    /// Sign a `Publish` of `body` to `target` at `timestamp`.
    ///
    /// Pure: identical inputs always yield the identical request.
    pub fn build(target: &SnsTarget, body: &str, timestamp: DateTime<Utc>) -> Result<Self> {
        let params = publish_params(target, body, timestamp);
        let canonical_query = canonical_query(&params);
        let signature = sign(
            target.secret_key.expose_secret(),
            &string_to_sign(&target.endpoint, &canonical_query),
        )?;
        let url = format!(
            "http://{}/?{}&Signature={}",
            target.endpoint,
            canonical_query,
            encode_signature(&signature)
        );
        Ok(Self {
            canonical_query,
            signature,
            url,
        })
    }
}

/// Parameters of an SNS `Publish` call, keyed and ordered by name.
pub fn publish_params(
    target: &SnsTarget,
    body: &str,
    timestamp: DateTime<Utc>,
) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("TopicArn", target.topic.clone()),
        ("Message", body.to_string()),
        ("Timestamp", timestamp.format(TIMESTAMP_FORMAT).to_string()),
        ("AWSAccessKeyId", target.access_key.clone()),
        ("Action", "Publish".to_string()),
        ("SignatureVersion", "2".to_string()),
        ("SignatureMethod", "HmacSHA256".to_string()),
    ])
}

/// Join encoded `key=value` pairs with `&`, in byte order of the keys.
pub fn canonical_query(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_param(key), encode_param(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `GET\n{endpoint}\n/\n{canonical_query}`.
pub fn string_to_sign(endpoint: &str, canonical_query: &str) -> String {
    ["GET", endpoint, "/", canonical_query].join("\n")
}

/// Base64 of HMAC-SHA256 over `message` keyed with `secret`.
pub fn sign(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| Error::InvalidKey)?;
    mac.update(message.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD
        .encode(mac.finalize().into_bytes())
        .trim()
        .to_string())
}
