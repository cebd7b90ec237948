//! # paymongo-rs
//!
//! A Rust client for the [PayMongo](https://www.paymongo.com) payments API, with
//! verification of PayMongo webhook signatures.
//!
//! ## Features
//!
//! - **API Client**: customers, payment intents and methods, checkout sessions,
//!   payments, refunds, subscriptions, invoices and webhook management
//! - **Webhook Verification**: HMAC-SHA256 signature checks with constant-time
//!   comparison and sandbox/production digest selection
//! - **Configuration**: typed settings loaded from `PAYMONGO_*` environment variables
//! - **Retries**: transient failures and 5xx responses are retried with a short backoff
//!
//! ## Quick Start
//!
//! ### Client Example
//!
//! ```rust,no_run
//! use paymongo_rs::PayMongoClient;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PayMongoClient::from_secret_key("sk_test_YOUR_SECRET_KEY")?;
//!
//! let intent = client
//!     .create_payment_intent(&json!({
//!         "amount": 10000,
//!         "currency": "PHP",
//!         "payment_method_allowed": ["qrph", "card"],
//!     }))
//!     .await?;
//!
//! println!("Payment intent: {}", intent["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Webhook Example
//!
//! ```rust
//! use paymongo_rs::{PayMongoError, WebhookVerifier};
//!
//! fn handle(body: &[u8], signature: &str) -> Result<(), PayMongoError> {
//!     let event = WebhookVerifier::new().verify(body, signature, "whsk_YOUR_SECRET", "production")?;
//!     println!("Received {}", event["data"]["attributes"]["type"]);
//!     Ok(())
//! }
//!
//! assert!(handle(b"{}", "t=1,li=forged").is_err());
//! ```
//!
//! ## API Conventions
//!
//! Requests are sent as `{"data":{"attributes":{...}}}` and authenticated with
//! the secret key as the Basic Auth username. Successful responses are
//! unwrapped to their `data` member; failures become [`ApiError`] carrying the
//! HTTP status and the decoded error body.
//!
//! ## Security
//!
//! - Secret keys are held in [`secrecy::SecretString`] and never printed by `Debug`
//! - Webhook digests are compared in constant time
//! - Webhook bodies are parsed only after their signature verifies
//!
//! ## References
//!
//! - [PayMongo API Reference](https://developers.paymongo.com/reference)
//! - [Securing a Webhook](https://developers.paymongo.com/docs/securing-a-webhook)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod types;
pub mod utils;
pub mod webhook;

// Re-export commonly used items
pub use client::PayMongoClient;
pub use config::{Environment, PayMongoConfig};
pub use endpoints::Endpoint;
pub use errors::{ApiError, PayMongoError, Result};
pub use types::{ApiErrorEntry, RefundReason, RequestEnvelope, ResponseEnvelope};
pub use webhook::{SignatureHeader, WebhookVerifier, SIGNATURE_HEADER};
