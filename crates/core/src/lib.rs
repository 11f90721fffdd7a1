//! Webhook payload authenticity verification
//!
//! Checks that a webhook body was produced by the holder of a shared secret
//! within an acceptable time window, then hands back the parsed payload.
//!
//! - **Headers**: id, timestamp and signature under current or legacy names
//! - **Timestamp**: inclusive ±tolerance window around the local clock
//! - **Signature**: HMAC-SHA256 over `{id}.{timestamp}.{payload}`, matched in
//!   constant time against every presented `v1` token
//! - **Configuration**: TOML-based verifier and logging settings
//!
//! # Example
//!
//! ```rust
//! use hooksig_core::{DeliveryHeaders, Verifier};
//!
//! let verifier = Verifier::new("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw")?;
//! let headers = DeliveryHeaders::new()
//!     .with("id", "msg_p5jXN8AQM9LWM0D4loKWxJek")
//!     .with("timestamp", "1614265330")
//!     .with("signature", "v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=");
//!
//! // `verify` reads the system clock; `verify_at` takes it explicitly
//! let payload = verifier.verify_at(r#"{"test": 2432232314}"#, &headers, 1614265330)?;
//! assert_eq!(payload["test"], 2432232314u64);
//! # Ok::<(), hooksig_core::WebhookVerificationError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod headers;
pub mod signature;
pub mod timestamp;
pub mod verifier;

pub use error::{exit_codes, ConfigError, ErrorCode, ErrorReport, Result, WebhookVerificationError};
pub use headers::{DeliveryHeaders, ExtractedHeaders, HeaderField};
pub use timestamp::DEFAULT_TOLERANCE;
pub use verifier::Verifier;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, VerifierConfig};
    pub use crate::error::{exit_codes, ErrorCode, Result, WebhookVerificationError};
    pub use crate::headers::{DeliveryHeaders, HeaderField};
    pub use crate::verifier::Verifier;
}
