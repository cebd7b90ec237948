//! Webhook signature verification.
//!
//! PayMongo signs every webhook notification with HMAC-SHA256 and sends the
//! result in the `Paymongo-Signature` header:
//!
//! ```text
//! t=1496734173,te=<test-mode digest>,li=<live-mode digest>
//! ```
//!
//! The signed message is `"{t}.{raw body}"`. Production endpoints must check
//! the `li` digest; sandbox endpoints check `te` and fall back to `li` when
//! only a live digest is present.
//!
//! Verification order matters: the body is parsed as JSON only after the
//! signature has been accepted, so a forged payload is never deserialized.

use crate::config::Environment;
use crate::errors::{PayMongoError, Result};
use crate::utils::{compute_signature, constant_time_eq, current_timestamp};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Name of the HTTP header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Paymongo-Signature";

/// Parsed components of a `Paymongo-Signature` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp (`t`), kept as sent
    pub timestamp: Option<String>,
    /// Test-mode digest (`te`)
    pub test_signature: Option<String>,
    /// Live-mode digest (`li`)
    pub live_signature: Option<String>,
}

impl SignatureHeader {
    /// Parses a signature header.
    ///
    /// Segments are split on `,` and then on the first `=`. Segments without
    /// a `=` and unknown keys are ignored. When a key repeats, the last
    /// occurrence wins. Parsing never fails; missing parts show up as `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use paymongo_rs::webhook::SignatureHeader;
    ///
    /// let header = SignatureHeader::parse("t=1496734173,te=abc,li=def");
    /// assert_eq!(header.timestamp.as_deref(), Some("1496734173"));
    /// assert_eq!(header.test_signature.as_deref(), Some("abc"));
    /// assert_eq!(header.live_signature.as_deref(), Some("def"));
    /// ```
    pub fn parse(header: &str) -> Self {
        let mut parsed = Self::default();

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key {
                "t" => parsed.timestamp = Some(value.to_string()),
                "te" => parsed.test_signature = Some(value.to_string()),
                "li" => parsed.live_signature = Some(value.to_string()),
                _ => {}
            }
        }

        parsed
    }

    /// The digest to check for `environment`.
    ///
    /// Production uses `li` only. Any other environment uses `te`, falling
    /// back to `li` only when `te` is absent. An empty selected value gives
    /// `None`.
    pub fn expected_signature(&self, environment: Environment) -> Option<&str> {
        let signature = match environment {
            Environment::Production => self.live_signature.as_deref(),
            Environment::Sandbox => self
                .test_signature
                .as_deref()
                .or(self.live_signature.as_deref()),
        };

        signature.filter(|s| !s.is_empty())
    }
}

/// Verifier for PayMongo webhook signatures.
///
/// Stateless; construct once and share, or create per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookVerifier {
    /// Maximum allowed distance between `t` and now, if enforced
    tolerance: Option<Duration>,
}

impl WebhookVerifier {
    /// Creates a verifier that accepts any timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also rejects signatures whose timestamp is further than `tolerance`
    /// from the current time, or is not a Unix timestamp.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Verifies a webhook signature and returns the parsed event.
    ///
    /// # Arguments
    ///
    /// * `payload` - The raw request body, exactly as received
    /// * `signature` - Value of the `Paymongo-Signature` header
    /// * `secret` - The webhook's signing secret
    /// * `environment` - `"production"` or anything else for sandbox
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - missing timestamp, no digest for the
    ///   environment, or digest mismatch
    /// - `InvalidPayload` - signature is valid but the body is not JSON
    ///
    /// # Examples
    ///
    /// ```
    /// use paymongo_rs::utils::compute_signature;
    /// use paymongo_rs::webhook::WebhookVerifier;
    ///
    /// let payload = r#"{"data":{"id":"evt_123"}}"#;
    /// let digest = compute_signature("whsk_secret", "1234567890", payload.as_bytes());
    /// let header = format!("t=1234567890,li={}", digest);
    ///
    /// let event = WebhookVerifier::new()
    ///     .verify(payload, &header, "whsk_secret", "production")
    ///     .unwrap();
    /// assert_eq!(event["data"]["id"], "evt_123");
    /// ```
    pub fn verify(
        &self,
        payload: impl AsRef<[u8]>,
        signature: &str,
        secret: &str,
        environment: impl Into<Environment>,
    ) -> Result<Value> {
        let payload = payload.as_ref();

        if !self.is_valid(payload, signature, secret, environment) {
            return Err(PayMongoError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| {
            debug!(error = %e, "Signed webhook payload is not valid JSON");
            PayMongoError::InvalidPayload(e.to_string())
        })
    }

    /// Checks a webhook signature without parsing the payload.
    ///
    /// Returns `true` exactly when [`verify`](Self::verify) would get past
    /// signature validation. Never fails.
    pub fn is_valid(
        &self,
        payload: impl AsRef<[u8]>,
        signature: &str,
        secret: &str,
        environment: impl Into<Environment>,
    ) -> bool {
        let environment = environment.into();
        let header = SignatureHeader::parse(signature);

        let Some(timestamp) = header.timestamp.as_deref().filter(|t| !t.is_empty()) else {
            debug!("Webhook signature rejected: missing timestamp");
            return false;
        };

        let Some(expected) = header.expected_signature(environment) else {
            debug!(%environment, "Webhook signature rejected: no signature for environment");
            return false;
        };

        let computed = compute_signature(secret, timestamp, payload.as_ref());
        if !constant_time_eq(computed.as_bytes(), expected.as_bytes()) {
            debug!(%environment, "Webhook signature rejected: signature mismatch");
            return false;
        }

        if let Some(tolerance) = self.tolerance {
            if !within_tolerance(timestamp, tolerance) {
                debug!(timestamp, "Webhook signature rejected: timestamp outside tolerance");
                return false;
            }
        }

        true
    }
}

fn within_tolerance(timestamp: &str, tolerance: Duration) -> bool {
    let Ok(sent_at) = timestamp.parse::<i64>() else {
        return false;
    };
    current_timestamp().abs_diff(sent_at) <= tolerance.as_secs()
}
