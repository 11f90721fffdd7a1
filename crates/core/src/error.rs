//! Verification error taxonomy with codes and serialisable reports
//!
//! Every failure of [`crate::Verifier`] is one kind of
//! [`WebhookVerificationError`]. Callers that only care about accepting or
//! rejecting a delivery can treat them uniformly; callers that alert on
//! clock skew versus forgery can branch on [`ErrorCode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::headers::HeaderField;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Header errors (1xxx)
    MissingHeader = 1001,

    // Secret errors (2xxx)
    InvalidSecret = 2001,

    // Timestamp errors (3xxx)
    InvalidTimestamp = 3001,
    TimestampOutOfTolerance = 3002,

    // Signature errors (4xxx)
    InvalidSignature = 4001,

    // Payload errors (5xxx)
    InvalidPayload = 5001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "Headers",
            2 => "Secret",
            3 => "Timestamp",
            4 => "Signature",
            5 => "Payload",
            _ => "Unknown",
        }
    }

    /// True when the delivery could not be shown to come from the sender.
    ///
    /// `InvalidPayload` is the only kind raised after authenticity was
    /// established.
    pub fn is_authenticity_failure(&self) -> bool {
        !matches!(self, ErrorCode::InvalidPayload)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Reasons a webhook delivery is rejected
#[derive(Debug, Error)]
pub enum WebhookVerificationError {
    /// A required header is absent under every accepted spelling
    #[error("Missing required header: {0}")]
    MissingHeader(HeaderField),

    /// The secret configuration string could not be decoded
    #[error("Invalid webhook secret: {0}")]
    InvalidSecret(#[from] hooksig_crypto::CryptoError),

    /// The timestamp header is not a base-10 integer
    #[error("Invalid timestamp header: {raw:?}")]
    InvalidTimestamp {
        /// Header value as received
        raw: String,
    },

    /// The timestamp lies outside the accepted window around `now`
    #[error("Message timestamp {timestamp} is outside the {tolerance_secs}s tolerance (now {now})")]
    TimestampOutOfTolerance {
        /// Parsed delivery timestamp (Unix seconds)
        timestamp: i64,
        /// Clock reading used for the check (Unix seconds)
        now: i64,
        /// Allowed distance in either direction
        tolerance_secs: u64,
    },

    /// No presented `v1` signature matches
    #[error("No matching signature found")]
    InvalidSignature,

    /// The delivery is authentic but its body is not valid JSON for the requested type
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl WebhookVerificationError {
    /// Error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingHeader(_) => ErrorCode::MissingHeader,
            Self::InvalidSecret(_) => ErrorCode::InvalidSecret,
            Self::InvalidTimestamp { .. } => ErrorCode::InvalidTimestamp,
            Self::TimestampOutOfTolerance { .. } => ErrorCode::TimestampOutOfTolerance,
            Self::InvalidSignature => ErrorCode::InvalidSignature,
            Self::InvalidPayload(_) => ErrorCode::InvalidPayload,
        }
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        let code = self.code();
        ErrorReport {
            code,
            code_str: code.to_string(),
            category: code.category().to_string(),
            message: self.to_string(),
            authenticity_failure: code.is_authenticity_failure(),
        }
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    pub authenticity_failure: bool,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WebhookVerificationError>;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// No secret was supplied by any source
    #[error("No webhook secret configured")]
    MissingSecret,

    /// The configured secret or tolerance is unusable
    #[error(transparent)]
    Verifier(#[from] WebhookVerificationError),
}

/// Exit codes for CLI commands
pub mod exit_codes {
    use super::ErrorCode;

    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
    pub const MISSING_HEADER: i32 = 10;
    pub const INVALID_SECRET: i32 = 11;
    pub const INVALID_TIMESTAMP: i32 = 12;
    pub const TIMESTAMP_OUT_OF_TOLERANCE: i32 = 13;
    pub const INVALID_SIGNATURE: i32 = 14;
    pub const INVALID_PAYLOAD: i32 = 15;

    /// Exit status for a verification failure
    pub fn for_code(code: ErrorCode) -> i32 {
        match code {
            ErrorCode::MissingHeader => MISSING_HEADER,
            ErrorCode::InvalidSecret => INVALID_SECRET,
            ErrorCode::InvalidTimestamp => INVALID_TIMESTAMP,
            ErrorCode::TimestampOutOfTolerance => TIMESTAMP_OUT_OF_TOLERANCE,
            ErrorCode::InvalidSignature => INVALID_SIGNATURE,
            ErrorCode::InvalidPayload => INVALID_PAYLOAD,
        }
    }
}
