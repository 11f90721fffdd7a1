//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Secret is not valid standard base64
    #[error("Invalid secret encoding: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    /// Secret decoded to zero bytes
    #[error("Secret is empty")]
    EmptySecret,
}
