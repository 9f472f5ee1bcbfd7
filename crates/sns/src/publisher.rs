use std::time::Duration;

use {
    chrono::Utc,
    hallmonitor_config::Configuration,
    secrecy::Secret,
    tracing::{debug, info},
};

use crate::{
    error::{Error, Result},
    signing::{SignedRequest, format_body},
};

/// Bound on a single publish request, so an unreachable backend cannot stall
/// event handling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest error body kept in [`Error::Status`], in bytes.
const MAX_ERROR_BODY: usize = 256;

/// Destination and credentials for a publish.
#[derive(Clone)]
pub struct SnsTarget {
    /// Hostname (optionally `host:port`), no scheme or path.
    pub endpoint: String,
    pub topic: String,
    pub access_key: String,
    pub secret_key: Secret<String>,
}

impl std::fmt::Debug for SnsTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnsTarget")
            .field("endpoint", &self.endpoint)
            .field("topic", &self.topic)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl From<&Configuration> for SnsTarget {
    fn from(config: &Configuration) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            topic: config.topic.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }
}

/// Issues signed `Publish` requests.
#[derive(Clone)]
pub struct SnsPublisher {
    http: reqwest::Client,
}

impl SnsPublisher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Sign and send `who - message` to the target topic.
    ///
    /// The response body is read and discarded. Any failure is returned to
    /// the caller, which decides whether to care; nothing is retried.
    pub async fn publish(&self, target: &SnsTarget, who: &str, message: &str) -> Result<()> {
        let request = SignedRequest::build(target, &format_body(who, message), Utc::now())?;
        debug!(endpoint = %target.endpoint, topic = %target.topic, "publishing notification");

        let resp = self.http.get(&request.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status,
                body: truncate_body(body),
            });
        }
        let _ = resp.bytes().await?;

        info!(endpoint = %target.endpoint, topic = %target.topic, who, "notification published");
        Ok(())
    }
}

/// Cut `body` to at most [`MAX_ERROR_BODY`] bytes on a char boundary.
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
