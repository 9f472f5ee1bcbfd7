//! Signed SNS publisher.
//!
//! Builds Signature Version 2 query-string requests by hand (canonical query,
//! HMAC-SHA256 over a fixed string-to-sign, two distinct percent-encoders)
//! and issues them as plain HTTP GETs.

pub mod encode;
pub mod error;
pub mod publisher;
pub mod signing;

pub use {
    error::{Error, Result},
    publisher::{DEFAULT_TIMEOUT, SnsPublisher, SnsTarget},
    signing::{SignedRequest, format_body},
};
