use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Connect, DNS, TLS, timeout, or body read failure.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The secret key could not be used as an HMAC key.
    #[error("invalid signing key")]
    InvalidKey,

    /// The backend answered with a non-success status.
    #[error("SNS publish failed ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
