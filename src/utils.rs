//! Utility functions for PayMongo operations.
//!
//! Signing primitives shared by the webhook verifier, plus helpers for
//! building signature headers and converting amounts.

use crate::config::Environment;
use crate::errors::{PayMongoError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the PayMongo webhook signature for a payload.
///
/// The signed message is `"{timestamp}.{payload}"`; the result is the
/// lowercase hex HMAC-SHA256 digest keyed by `secret`.
///
/// # Examples
///
/// ```
/// use paymongo_rs::utils::compute_signature;
///
/// let digest = compute_signature("whsk_secret", "1234567890", b"{}");
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, digest.to_lowercase());
/// ```
pub fn compute_signature(secret: &str, timestamp: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two byte strings in time independent of their contents.
///
/// Unequal lengths return `false` immediately; lengths are not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a signature header in PayMongo's `t=...,te=...,li=...` format.
///
/// # Examples
///
/// ```
/// use paymongo_rs::utils::build_signature_header;
///
/// let header = build_signature_header("1234567890", Some("abc"), None);
/// assert_eq!(header, "t=1234567890,te=abc");
/// ```
pub fn build_signature_header(
    timestamp: &str,
    test_signature: Option<&str>,
    live_signature: Option<&str>,
) -> String {
    let mut header = format!("t={}", timestamp);
    if let Some(te) = test_signature {
        header.push_str(",te=");
        header.push_str(te);
    }
    if let Some(li) = live_signature {
        header.push_str(",li=");
        header.push_str(li);
    }
    header
}

/// Signs a payload the way PayMongo does for the given environment.
///
/// Sandbox headers carry the digest under `te`, production headers under
/// `li`. Useful for exercising webhook handlers locally.
///
/// # Examples
///
/// ```
/// use paymongo_rs::config::Environment;
/// use paymongo_rs::utils::sign_webhook_payload;
/// use paymongo_rs::webhook::WebhookVerifier;
///
/// let payload = br#"{"data":{"id":"evt_123"}}"#;
/// let header = sign_webhook_payload("whsk_secret", "1234567890", payload, Environment::Production);
///
/// assert!(WebhookVerifier::new().is_valid(payload, &header, "whsk_secret", "production"));
/// ```
pub fn sign_webhook_payload(
    secret: &str,
    timestamp: &str,
    payload: &[u8],
    environment: Environment,
) -> String {
    let digest = compute_signature(secret, timestamp, payload);
    match environment {
        Environment::Production => build_signature_header(timestamp, None, Some(&digest)),
        Environment::Sandbox => build_signature_header(timestamp, Some(&digest), None),
    }
}

/// Gets the current Unix timestamp in seconds.
///
/// # Examples
///
/// ```
/// use paymongo_rs::utils::current_timestamp;
///
/// assert!(current_timestamp() > 1600000000);
/// ```
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Converts an amount in major currency units to centavos.
///
/// PayMongo expects integer amounts in the smallest currency unit, so
/// PHP 100.50 is sent as `10050`.
///
/// # Examples
///
/// ```
/// use paymongo_rs::utils::to_centavos;
///
/// assert_eq!(to_centavos(100.50).unwrap(), 10050);
/// assert!(to_centavos(-1.0).is_err());
/// ```
pub fn to_centavos(amount: f64) -> Result<u64> {
    if !amount.is_finite() {
        return Err(PayMongoError::InvalidAmount(format!("{} is not a finite number", amount)));
    }
    if amount < 0.0 {
        return Err(PayMongoError::InvalidAmount("Amount must not be negative".to_string()));
    }

    let centavos = (amount * 100.0).round();
    if centavos > u64::MAX as f64 {
        return Err(PayMongoError::InvalidAmount(format!("{} is too large", amount)));
    }

    Ok(centavos as u64)
}
