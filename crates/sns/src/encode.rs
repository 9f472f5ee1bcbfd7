//! The two percent-encoders used when building a signed request.
//!
//! They differ on purpose and must not be swapped: the canonical query uses
//! the RFC 3986 unreserved set, the signature uses form encoding.

use std::borrow::Cow;

/// Encode a canonical query key or value.
///
/// Only `A-Z a-z 0-9 - _ . ~` pass through; everything else, `/` and space
/// included, becomes `%XX` over the UTF-8 bytes.
pub fn encode_param(input: &str) -> Cow<'_, str> {
    urlencoding::encode(input)
}

/// Encode the base64 signature for the trailing `Signature=` parameter.
///
/// Form encoding: space becomes `+`, while `+`, `/` and `=` are escaped.
pub fn encode_signature(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}
