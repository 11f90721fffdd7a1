//! Webhook secret decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{hmac_sha256_base64, CryptoError, Result};

/// Optional prefix carried by webhook secret configuration strings.
pub const SECRET_PREFIX: &str = "whsec_";

/// Decoded webhook signing secret.
///
/// Decoding happens once, in [`WebhookSecret::decode`]; the raw bytes are
/// kept for the lifetime of the value and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret {
    bytes: Vec<u8>,
}

impl WebhookSecret {
    /// Decode a secret configuration string.
    ///
    /// Surrounding whitespace and an optional `whsec_` prefix are removed,
    /// then the remainder is decoded as standard padded base64. Malformed
    /// input is an error, never a partial decode.
    pub fn decode(config: &str) -> Result<Self> {
        let trimmed = config.trim();
        let encoded = trimmed.strip_prefix(SECRET_PREFIX).unwrap_or(trimmed);
        let bytes = STANDARD.decode(encoded)?;
        if bytes.is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Build a secret from raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of key bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a successfully constructed secret.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 HMAC-SHA256 of `message` under this secret.
    pub fn sign_base64(&self, message: &[u8]) -> String {
        hmac_sha256_base64(&self.bytes, message)
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSecret")
            .field("bytes", &"[REDACTED]")
            .field("len", &self.bytes.len())
            .finish()
    }
}
