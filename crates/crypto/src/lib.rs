//! Cryptographic primitives for webhook verification.
//!
//! This crate provides:
//! - Webhook secret decoding (`whsec_` prefixed base64)
//! - HMAC-SHA256 with base64 output
//! - Constant-time comparison for security

#![warn(missing_docs)]

mod error;
mod hmac_impl;
mod secret;
mod timing;

pub use error::{CryptoError, Result};
pub use hmac_impl::{hmac_sha256, hmac_sha256_base64};
pub use secret::{WebhookSecret, SECRET_PREFIX};
pub use timing::constant_time_compare;
