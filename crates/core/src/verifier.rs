//! Webhook payload verifier
//!
//! [`Verifier`] decodes the signing secret once and then checks deliveries
//! in a fixed order: headers, timestamp, signature, payload. Each step
//! returns as soon as it fails, so no HMAC is computed for a delivery with
//! a missing header or a stale timestamp.

use serde::de::DeserializeOwned;
use std::time::Duration;

use hooksig_crypto::WebhookSecret;

use crate::config::VerifierConfig;
use crate::error::{ConfigError, Result};
use crate::headers::{extract, DeliveryHeaders};
use crate::signature::{compute_expected, matches};
use crate::timestamp::{now_unix, validate_timestamp, DEFAULT_TOLERANCE};
use crate::WebhookVerificationError;

/// Verifies signed webhook deliveries against one shared secret.
///
/// Immutable after construction; clone it or share it behind an `Arc`
/// across threads.
#[derive(Debug, Clone)]
pub struct Verifier {
    secret: WebhookSecret,
    tolerance: Duration,
}

impl Verifier {
    /// Create a verifier from a secret configuration string
    /// (`whsec_` prefix optional, remainder standard base64).
    pub fn new(secret: &str) -> Result<Self> {
        Ok(Self::from_secret(WebhookSecret::decode(secret)?))
    }

    /// Create a verifier from an already decoded secret.
    pub fn from_secret(secret: WebhookSecret) -> Self {
        Self {
            secret,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create a verifier from the `[verifier]` config section.
    pub fn from_config(config: &VerifierConfig) -> std::result::Result<Self, ConfigError> {
        let secret = config.secret.as_deref().ok_or(ConfigError::MissingSecret)?;
        Ok(Self::new(secret)?.with_tolerance(config.tolerance()))
    }

    /// Replace the timestamp tolerance window.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Accepted distance between delivery time and the local clock.
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Verify a delivery against the current time and return its JSON body.
    pub fn verify(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &DeliveryHeaders,
    ) -> Result<serde_json::Value> {
        self.verify_at(payload, headers, now_unix())
    }

    /// Verify a delivery against an explicit clock reading (Unix seconds).
    pub fn verify_at(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &DeliveryHeaders,
        now: i64,
    ) -> Result<serde_json::Value> {
        self.verify_as_at(payload, headers, now)
    }

    /// Verify a delivery and deserialize its body into `T`.
    pub fn verify_as<T: DeserializeOwned>(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &DeliveryHeaders,
    ) -> Result<T> {
        self.verify_as_at(payload, headers, now_unix())
    }

    /// [`verify_as`](Self::verify_as) with an explicit clock reading.
    pub fn verify_as_at<T: DeserializeOwned>(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &DeliveryHeaders,
        now: i64,
    ) -> Result<T> {
        let payload = payload.as_ref();
        self.authenticate_at(payload, headers, now)?;
        Ok(serde_json::from_slice(payload)?)
    }

    /// Check headers, timestamp and signature without parsing the body.
    pub fn authenticate_at(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &DeliveryHeaders,
        now: i64,
    ) -> Result<()> {
        let delivery = extract(headers)?;
        validate_timestamp(delivery.timestamp, now, self.tolerance)?;

        let expected = compute_expected(
            &self.secret,
            delivery.id,
            delivery.timestamp,
            payload.as_ref(),
        );
        if !matches(delivery.signature, &expected) {
            return Err(WebhookVerificationError::InvalidSignature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderField;
    use crate::signature::signed_content;
    use crate::ErrorCode;
    use proptest::prelude::*;
    use std::sync::Arc;

    const SECRET: &str = "MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const MSG_ID: &str = "msg_p5jXN8AQM9LWM0D4loKWxJek";
    const PAYLOAD: &str = r#"{"test": 2432232314}"#;
    const NOW: i64 = 1_614_265_330;

    fn sign(id: &str, timestamp: &str, payload: &[u8]) -> String {
        let secret = WebhookSecret::decode(SECRET).unwrap();
        format!("v1,{}", secret.sign_base64(&signed_content(id, timestamp, payload)))
    }

    fn headers_at(timestamp: i64) -> DeliveryHeaders {
        let ts = timestamp.to_string();
        DeliveryHeaders::new()
            .with("id", MSG_ID)
            .with("timestamp", &ts)
            .with("signature", sign(MSG_ID, &ts, PAYLOAD.as_bytes()))
    }

    fn verifier() -> Verifier {
        Verifier::new(SECRET).unwrap()
    }

    #[test]
    fn test_valid_signature_returns_payload() {
        let json = verifier().verify_at(PAYLOAD, &headers_at(NOW), NOW).unwrap();
        assert_eq!(json["test"], 2432232314u64);
    }

    #[test]
    fn test_known_vector_header() {
        let headers = DeliveryHeaders::new()
            .with("svix-id", MSG_ID)
            .with("svix-timestamp", "1614265330")
            .with("svix-signature", "v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=");

        assert!(verifier().verify_at(PAYLOAD, &headers, NOW).is_ok());
    }

    #[test]
    fn test_verify_uses_wall_clock() {
        let now = now_unix();
        let json = verifier().verify(PAYLOAD, &headers_at(now)).unwrap();
        assert_eq!(json["test"], 2432232314u64);
    }

    #[test]
    fn test_prefixed_secret_verifies_same() {
        let verifier = Verifier::new(&format!("whsec_{SECRET}")).unwrap();
        assert!(verifier.verify_at(PAYLOAD, &headers_at(NOW), NOW).is_ok());
    }

    #[test]
    fn test_invalid_secret() {
        let err = Verifier::new("not base64!").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSecret);
    }

    #[test]
    fn test_missing_each_header() {
        for field in HeaderField::ALL {
            let mut headers = headers_at(NOW);
            headers.remove(field.canonical_name());

            let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
            assert!(
                matches!(err, WebhookVerificationError::MissingHeader(f) if f == field),
                "{err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_signature() {
        let headers = headers_at(NOW).with(
            "signature",
            "v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLawdd",
        );
        let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSignature);
    }

    #[test]
    fn test_signature_without_v1_token() {
        let good = sign(MSG_ID, &NOW.to_string(), PAYLOAD.as_bytes());
        let v2_only = good.replacen("v1,", "v2,", 1);

        for header in ["garbage", "", v2_only.as_str()] {
            let headers = headers_at(NOW).with("signature", header);
            let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidSignature);
        }
    }

    #[test]
    fn test_rotation_multiple_signatures() {
        let good = sign(MSG_ID, &NOW.to_string(), PAYLOAD.as_bytes());
        let header = format!("v1,c3RhbGUtc2lnbmF0dXJl {good} v2,ZnV0dXJl");
        let headers = headers_at(NOW).with("signature", header);

        assert!(verifier().verify_at(PAYLOAD, &headers, NOW).is_ok());
    }

    #[test]
    fn test_timestamp_tolerance_boundaries() {
        let v = verifier();
        for offset in [-300, 300] {
            assert!(v.verify_at(PAYLOAD, &headers_at(NOW + offset), NOW).is_ok());
        }
        for offset in [-301, 301] {
            let err = v
                .verify_at(PAYLOAD, &headers_at(NOW + offset), NOW)
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::TimestampOutOfTolerance);
        }
    }

    #[test]
    fn test_stale_timestamp_rejected_before_signature() {
        // Garbage signature, stale timestamp: the timestamp failure wins
        let headers = headers_at(NOW - 3_600).with("signature", "v1,AAAA");
        let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TimestampOutOfTolerance);
    }

    #[test]
    fn test_invalid_timestamp() {
        let headers = headers_at(NOW).with("timestamp", "teadwd");
        let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTimestamp);
    }

    #[test]
    fn test_timestamp_signed_as_received() {
        // A zero-padded timestamp parses to the same instant but signs differently
        let padded = format!("0{NOW}");
        let headers = DeliveryHeaders::new()
            .with("id", MSG_ID)
            .with("timestamp", &padded)
            .with("signature", sign(MSG_ID, &NOW.to_string(), PAYLOAD.as_bytes()));

        let err = verifier().verify_at(PAYLOAD, &headers, NOW).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSignature);

        let headers = headers.with("signature", sign(MSG_ID, &padded, PAYLOAD.as_bytes()));
        assert!(verifier().verify_at(PAYLOAD, &headers, NOW).is_ok());
    }

    #[test]
    fn test_authentic_but_malformed_payload() {
        let body = "{not json";
        let ts = NOW.to_string();
        let headers = DeliveryHeaders::new()
            .with("id", MSG_ID)
            .with("timestamp", &ts)
            .with("signature", sign(MSG_ID, &ts, body.as_bytes()));

        let v = verifier();
        assert!(v.authenticate_at(body, &headers, NOW).is_ok());

        let err = v.verify_at(body, &headers, NOW).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPayload);
        assert!(!err.code().is_authenticity_failure());
    }

    #[test]
    fn test_verify_as_typed() {
        #[derive(serde::Deserialize)]
        struct Payload {
            test: u64,
        }

        let payload: Payload = verifier()
            .verify_as_at(PAYLOAD, &headers_at(NOW), NOW)
            .unwrap();
        assert_eq!(payload.test, 2432232314);
    }

    #[test]
    fn test_bytes_and_str_payloads_agree() {
        let v = verifier();
        let headers = headers_at(NOW);
        let from_str = v.verify_at(PAYLOAD, &headers, NOW).unwrap();
        let from_bytes = v.verify_at(PAYLOAD.as_bytes().to_vec(), &headers, NOW).unwrap();
        assert_eq!(from_str, from_bytes);
    }

    #[test]
    fn test_idempotent() {
        let v = verifier();
        let headers = headers_at(NOW);
        let first = v.verify_at(PAYLOAD, &headers, NOW).unwrap();
        let second = v.verify_at(PAYLOAD, &headers, NOW).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_tolerance() {
        let v = verifier().with_tolerance(Duration::from_secs(10));
        assert_eq!(v.tolerance(), Duration::from_secs(10));
        assert!(v.verify_at(PAYLOAD, &headers_at(NOW - 10), NOW).is_ok());
        assert!(v.verify_at(PAYLOAD, &headers_at(NOW - 11), NOW).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = VerifierConfig {
            secret: Some(format!("whsec_{SECRET}")),
            tolerance_secs: 60,
        };
        let v = Verifier::from_config(&config).unwrap();
        assert_eq!(v.tolerance(), Duration::from_secs(60));

        let missing = VerifierConfig::default();
        assert!(matches!(
            Verifier::from_config(&missing),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let v = Arc::new(verifier());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let v = Arc::clone(&v);
                std::thread::spawn(move || v.verify_at(PAYLOAD, &headers_at(NOW), NOW).is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_verifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Verifier>();
    }

    proptest! {
        #[test]
        fn prop_correctly_signed_payload_verifies(
            id in "[A-Za-z0-9_]{1,32}",
            offset in -300i64..=300,
            value in any::<i64>(),
        ) {
            let payload = format!(r#"{{"value": {value}}}"#);
            let ts = (NOW + offset).to_string();
            let headers = DeliveryHeaders::new()
                .with("id", &id)
                .with("timestamp", &ts)
                .with("signature", sign(&id, &ts, payload.as_bytes()));

            let json = verifier().verify_at(&payload, &headers, NOW).unwrap();
            prop_assert_eq!(json["value"].as_i64(), Some(value));
        }

        #[test]
        fn prop_tampered_payload_rejected(index in 0usize..20, byte in any::<u8>()) {
            let mut tampered = PAYLOAD.as_bytes().to_vec();
            prop_assume!(tampered[index] != byte);
            tampered[index] = byte;

            let err = verifier().authenticate_at(&tampered, &headers_at(NOW), NOW).unwrap_err();
            prop_assert_eq!(err.code(), ErrorCode::InvalidSignature);
        }
    }
}
