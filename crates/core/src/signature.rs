//! Canonical signed content and `v1` signature matching

use hooksig_crypto::{constant_time_compare, WebhookSecret};

/// Signature scheme version this crate verifies.
pub const SIGNATURE_VERSION: &str = "v1";

/// Build the bytes the sender signs: `{id}.{timestamp}.{payload}`.
///
/// `timestamp` is the header value as received; re-formatting it would
/// change the signed bytes.
pub fn signed_content(id: &str, timestamp: &str, payload: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(id.len() + timestamp.len() + payload.len() + 2);
    content.extend_from_slice(id.as_bytes());
    content.push(b'.');
    content.extend_from_slice(timestamp.as_bytes());
    content.push(b'.');
    content.extend_from_slice(payload);
    content
}

/// Base64 HMAC-SHA256 of the canonical content under `secret`.
pub fn compute_expected(secret: &WebhookSecret, id: &str, timestamp: &str, payload: &[u8]) -> String {
    secret.sign_base64(&signed_content(id, timestamp, payload))
}

/// One `version,value` token from a signature header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureToken<'a> {
    pub version: &'a str,
    pub value: &'a str,
}

/// Parsed view over a signature header value
#[derive(Debug, Clone, Copy)]
pub struct SignatureList<'a> {
    raw: &'a str,
}

impl<'a> SignatureList<'a> {
    /// Wrap a raw header value; parsing is lazy
    pub fn parse(raw: &'a str) -> Self {
        Self { raw }
    }

    /// All well-formed tokens, whatever their version.
    ///
    /// Tokens without a comma are skipped rather than treated as errors.
    pub fn tokens(self) -> impl Iterator<Item = SignatureToken<'a>> {
        self.raw.split_whitespace().filter_map(|token| {
            token
                .split_once(',')
                .map(|(version, value)| SignatureToken { version, value })
        })
    }

    /// Values of the `v1` tokens, in header order
    pub fn v1(self) -> impl Iterator<Item = &'a str> {
        self.tokens()
            .filter(|token| token.version == SIGNATURE_VERSION)
            .map(|token| token.value)
    }
}

/// True if any `v1` token in `header` equals `expected`.
///
/// Each candidate is compared in constant time. A header with no `v1`
/// token never matches.
pub fn matches(header: &str, expected: &str) -> bool {
    SignatureList::parse(header)
        .v1()
        .any(|candidate| constant_time_compare(candidate.as_bytes(), expected.as_bytes()))
}
