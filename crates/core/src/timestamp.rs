//! Timestamp parsing and tolerance enforcement

use std::time::Duration;

use crate::error::{Result, WebhookVerificationError};

/// Maximum accepted distance between a delivery timestamp and the local clock.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(5 * 60);

/// Current wall-clock time in Unix seconds.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Parse a timestamp header value as base-10 Unix seconds.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| WebhookVerificationError::InvalidTimestamp {
            raw: raw.to_string(),
        })
}

/// Parse `raw` and check it lies within `tolerance` of `now`.
///
/// The window is inclusive: a timestamp exactly `tolerance` seconds away
/// is accepted. Stale and future timestamps are rejected alike.
pub fn validate_timestamp(raw: &str, now: i64, tolerance: Duration) -> Result<i64> {
    let timestamp = parse_timestamp(raw)?;
    let tolerance_secs = tolerance.as_secs();

    if now.abs_diff(timestamp) > tolerance_secs {
        return Err(WebhookVerificationError::TimestampOutOfTolerance {
            timestamp,
            now,
            tolerance_secs,
        });
    }

    Ok(timestamp)
}
