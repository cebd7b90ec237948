//! PayMongo API client.
//!
//! [`PayMongoClient`] turns each supported operation into a single REST call:
//! it authenticates with the secret key over HTTP Basic Auth, wraps attributes
//! in the `{"data":{"attributes":...}}` envelope, retries transient failures
//! and unwraps the `data` member of the response.

use crate::config::{PayMongoConfig, DEFAULT_BASE_URL, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::endpoints::Endpoint;
use crate::errors::{ApiError, PayMongoError, Result};
use crate::types::{
    AttachPaymentMethod, ChangePaymentMethod, ChangePlan, CreateRefund, CreateWebhook,
    RefundReason, RequestEnvelope, ResponseEnvelope,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed pause between attempts.
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Client for the PayMongo REST API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct PayMongoClient {
    /// Secret API key, sent as the Basic Auth username
    secret_key: SecretString,

    /// API base URL without trailing slash
    base_url: String,

    /// Per-attempt timeout
    timeout: Duration,

    /// Retries after a failed attempt
    retries: u32,

    /// HTTP client to use for requests
    http_client: Client,
}

impl PayMongoClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `secret_key` - PayMongo secret key (`sk_test_...` or `sk_live_...`)
    /// * `base_url` - API base URL, e.g. `https://api.paymongo.com/v1`
    /// * `timeout_secs` - Timeout for each attempt, in seconds; `0` disables it
    /// * `retries` - How many times a transient failure is retried
    ///
    /// # Errors
    ///
    /// Returns `MissingSecretKey` if `secret_key` is empty, and
    /// `UrlParseError` if `base_url` is not a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use paymongo_rs::client::PayMongoClient;
    ///
    /// let client = PayMongoClient::new("sk_test_abc123", "https://api.paymongo.com/v1", 15, 2).unwrap();
    /// assert_eq!(client.base_url(), "https://api.paymongo.com/v1");
    ///
    /// assert!(PayMongoClient::new("", "https://api.paymongo.com/v1", 15, 2).is_err());
    /// ```
    pub fn new(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
        retries: u32,
    ) -> Result<Self> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(PayMongoError::MissingSecretKey);
        }

        let base_url = base_url.into();
        url::Url::parse(&base_url)?;

        Ok(Self {
            secret_key: SecretString::new(secret_key),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            retries,
            http_client: Client::new(),
        })
    }

    /// Creates a client for the public API with default timeout and retries.
    pub fn from_secret_key(secret_key: impl Into<String>) -> Result<Self> {
        Self::new(secret_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_RETRIES)
    }

    /// Creates a client from a loaded configuration.
    pub fn from_config(config: &PayMongoConfig) -> Result<Self> {
        Self::new(
            config.secret_key.expose_secret().as_str(),
            config.base_url.as_str(),
            config.timeout_secs,
            config.retries,
        )
    }

    /// Sets a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// The secret key used for authentication.
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout applied to each attempt; zero means none.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of retries after a failed attempt.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    // ==================
    // Customers
    // ==================

    /// Creates a customer.
    pub async fn create_customer<A: Serialize + ?Sized>(&self, attributes: &A) -> Result<Value> {
        self.post(Endpoint::CreateCustomer, attributes).await
    }

    /// Retrieves a customer by ID.
    pub async fn get_customer(&self, id: &str) -> Result<Value> {
        self.get(Endpoint::GetCustomer(id)).await
    }

    // ==================
    // Payment intents and methods
    // ==================

    /// Creates a payment intent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use paymongo_rs::client::PayMongoClient;
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = PayMongoClient::from_secret_key("sk_test_abc123")?;
    ///
    /// let intent = client
    ///     .create_payment_intent(&json!({
    ///         "amount": 10000,
    ///         "currency": "PHP",
    ///         "payment_method_allowed": ["qrph"],
    ///     }))
    ///     .await?;
    ///
    /// println!("Created {}", intent["id"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_payment_intent<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
    ) -> Result<Value> {
        self.post(Endpoint::CreatePaymentIntent, attributes).await
    }

    /// Retrieves a payment intent by ID.
    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<Value> {
        self.get(Endpoint::RetrievePaymentIntent(id)).await
    }

    /// Creates a payment method.
    pub async fn create_payment_method<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
    ) -> Result<Value> {
        self.post(Endpoint::CreatePaymentMethod, attributes).await
    }

    /// Attaches a payment method to a payment intent.
    ///
    /// `client_key` is only sent when given.
    pub async fn attach_payment_method(
        &self,
        intent_id: &str,
        method_id: &str,
        client_key: Option<&str>,
    ) -> Result<Value> {
        let attributes = AttachPaymentMethod {
            payment_method: method_id.to_string(),
            client_key: client_key.map(str::to_string),
        };
        self.post(Endpoint::AttachPaymentMethod(intent_id), &attributes)
            .await
    }

    // ==================
    // Checkout sessions
    // ==================

    /// Creates a hosted checkout session.
    pub async fn create_checkout_session<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
    ) -> Result<Value> {
        self.post(Endpoint::CreateCheckoutSession, attributes).await
    }

    /// Retrieves a checkout session by ID.
    pub async fn retrieve_checkout_session(&self, id: &str) -> Result<Value> {
        self.get(Endpoint::RetrieveCheckoutSession(id)).await
    }

    // ==================
    // Payments and refunds
    // ==================

    /// Retrieves a payment by ID.
    pub async fn retrieve_payment(&self, id: &str) -> Result<Value> {
        self.get(Endpoint::RetrievePayment(id)).await
    }

    /// Refunds `amount` centavos of a payment.
    pub async fn create_refund(
        &self,
        payment_id: &str,
        amount: u64,
        reason: RefundReason,
    ) -> Result<Value> {
        let attributes = CreateRefund {
            amount,
            payment_id: payment_id.to_string(),
            reason,
        };
        self.post(Endpoint::CreateRefund, &attributes).await
    }

    // ==================
    // Subscriptions
    // ==================

    /// Creates a subscription plan.
    pub async fn create_plan<A: Serialize + ?Sized>(&self, attributes: &A) -> Result<Value> {
        self.post(Endpoint::CreatePlan, attributes).await
    }

    /// Creates a subscription.
    pub async fn create_subscription<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
    ) -> Result<Value> {
        self.post(Endpoint::CreateSubscription, attributes).await
    }

    /// Cancels a subscription.
    pub async fn cancel_subscription(&self, id: &str) -> Result<Value> {
        self.post_empty(Endpoint::CancelSubscription(id)).await
    }

    /// Moves a subscription to another plan.
    pub async fn change_subscription_plan(&self, id: &str, plan_id: &str) -> Result<Value> {
        let attributes = ChangePlan {
            plan_id: plan_id.to_string(),
        };
        self.post(Endpoint::ChangeSubscriptionPlan(id), &attributes)
            .await
    }

    /// Retrieves a subscription by ID.
    pub async fn get_subscription(&self, id: &str) -> Result<Value> {
        self.get(Endpoint::GetSubscription(id)).await
    }

    /// Changes the payment method billed for a subscription.
    pub async fn change_payment_method(
        &self,
        subscription_id: &str,
        payment_method_id: &str,
    ) -> Result<Value> {
        let attributes = ChangePaymentMethod {
            payment_method_id: payment_method_id.to_string(),
        };
        self.post(Endpoint::ChangePaymentMethod(subscription_id), &attributes)
            .await
    }

    /// Pays an open subscription invoice.
    pub async fn pay_invoice(&self, invoice_id: &str) -> Result<Value> {
        self.post_empty(Endpoint::PayInvoice(invoice_id)).await
    }

    // ==================
    // Webhooks
    // ==================

    /// Lists registered webhooks.
    pub async fn list_webhooks(&self) -> Result<Value> {
        self.get(Endpoint::ListWebhooks).await
    }

    /// Registers a webhook for the given event types.
    pub async fn create_webhook<S: AsRef<str>>(&self, url: &str, events: &[S]) -> Result<Value> {
        let attributes = CreateWebhook {
            url: url.to_string(),
            events: events.iter().map(|e| e.as_ref().to_string()).collect(),
        };
        self.post(Endpoint::CreateWebhook, &attributes).await
    }

    /// Enables a webhook.
    pub async fn enable_webhook(&self, id: &str) -> Result<Value> {
        self.post_empty(Endpoint::EnableWebhook(id)).await
    }

    /// Disables a webhook.
    pub async fn disable_webhook(&self, id: &str) -> Result<Value> {
        self.post_empty(Endpoint::DisableWebhook(id)).await
    }

    // ==================
    // HTTP helpers
    // ==================

    async fn get(&self, endpoint: Endpoint<'_>) -> Result<Value> {
        self.send(endpoint, None).await
    }

    async fn post<A: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint<'_>,
        attributes: &A,
    ) -> Result<Value> {
        let body = serde_json::to_value(RequestEnvelope::new(attributes))?;
        self.send(endpoint, Some(body)).await
    }

    async fn post_empty(&self, endpoint: Endpoint<'_>) -> Result<Value> {
        self.send(endpoint, None).await
    }

    /// Performs the request and unwraps the response envelope.
    async fn send(&self, endpoint: Endpoint<'_>, body: Option<Value>) -> Result<Value> {
        let (status, raw) = self.dispatch(endpoint, body.as_ref()).await?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &raw);
            warn!(
                %endpoint,
                status = status.as_u16(),
                error_type = err.error_type().unwrap_or("unknown"),
                "PayMongo request failed"
            );
            return Err(err.into());
        }

        Ok(unwrap_data(&raw))
    }

    /// Sends the request and reads the body, retrying connection failures,
    /// timeouts and 5xx responses.
    ///
    /// Makes at most `1 + retries` attempts and returns the last outcome.
    async fn dispatch(
        &self,
        endpoint: Endpoint<'_>,
        body: Option<&Value>,
    ) -> std::result::Result<(StatusCode, String), ApiError> {
        let url = endpoint.url(&self.base_url);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(%endpoint, attempt, "Sending PayMongo request");

            let outcome = self.attempt(endpoint, &url, body).await;

            let retryable = match &outcome {
                Ok((status, _)) => status.is_server_error(),
                Err(failure) => failure.is_transient(),
            };
            if !retryable || attempt > self.retries {
                return outcome.map_err(AttemptError::into_api_error);
            }

            match &outcome {
                Ok((status, _)) => warn!(
                    %endpoint,
                    attempt,
                    status = status.as_u16(),
                    "PayMongo server error, retrying"
                ),
                Err(failure) => warn!(
                    %endpoint,
                    attempt,
                    error = %failure.source,
                    "PayMongo request failed, retrying"
                ),
            }

            tokio::time::sleep(RETRY_BACKOFF).await;
        }
    }

    /// One round trip: send the request and read the whole body.
    async fn attempt(
        &self,
        endpoint: Endpoint<'_>,
        url: &str,
        body: Option<&Value>,
    ) -> std::result::Result<(StatusCode, String), AttemptError> {
        let mut request = self
            .http_client
            .request(endpoint.method(), url)
            .basic_auth(self.secret_key.expose_secret(), Some(""))
            .header(ACCEPT, "application/json");

        // Zero disables the per-attempt deadline.
        if !self.timeout.is_zero() {
            request = request.timeout(self.timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| AttemptError {
            status: None,
            source,
        })?;

        let status = response.status();
        let raw = response.text().await.map_err(|source| AttemptError {
            status: Some(status),
            source,
        })?;

        Ok((status, raw))
    }
}

/// A failed attempt, with the status when the headers had already arrived.
struct AttemptError {
    status: Option<StatusCode>,
    source: reqwest::Error,
}

impl AttemptError {
    /// Failures while sending, or while reading a body that was cut short or
    /// stalled past the deadline, are worth another attempt.
    fn is_transient(&self) -> bool {
        if self.status.is_some() {
            return is_transient(&self.source) || self.source.is_body() || self.source.is_decode();
        }
        is_transient(&self.source)
    }

    fn into_api_error(self) -> ApiError {
        let status = self.status;
        let err = ApiError::transport(self.source);
        match status {
            Some(status) => err.with_status(status.as_u16()),
            None => err,
        }
    }
}

/// Connection-level failures worth another attempt.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Extracts `data` from a success body; anything else yields an empty object.
fn unwrap_data(raw: &str) -> Value {
    match serde_json::from_str::<ResponseEnvelope>(raw) {
        Ok(envelope) => envelope
            .data
            .filter(|data| !data.is_null())
            .unwrap_or_else(|| Value::Object(Map::new())),
        Err(e) => {
            debug!(error = %e, "PayMongo success response is not an envelope");
            Value::Object(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client =
            PayMongoClient::new("sk_test_abc123", "https://api.paymongo.com/v1/", 30, 1).unwrap();
        assert_eq!(client.secret_key().expose_secret(), "sk_test_abc123");
        assert_eq!(client.base_url(), "https://api.paymongo.com/v1");
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.retries(), 1);
    }

    #[test]
    fn test_empty_secret_key_fails_fast() {
        let result = PayMongoClient::new("", DEFAULT_BASE_URL, 15, 2);
        assert!(matches!(result, Err(PayMongoError::MissingSecretKey)));

        let result = PayMongoClient::new("   ", DEFAULT_BASE_URL, 15, 2);
        assert!(matches!(result, Err(PayMongoError::MissingSecretKey)));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = PayMongoClient::new("sk_test_abc123", "api.paymongo.com", 15, 2);
        assert!(matches!(result, Err(PayMongoError::UrlParseError(_))));
    }

    #[test]
    fn test_from_config() {
        let config = PayMongoConfig::new("sk_test_abc123")
            .with_base_url("http://localhost:9999/v1")
            .with_timeout(5)
            .with_retries(0);
        let client = PayMongoClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.retries(), 0);

        let missing = PayMongoConfig::new("");
        assert!(matches!(
            PayMongoClient::from_config(&missing),
            Err(PayMongoError::MissingSecretKey)
        ));
    }

    #[test]
    fn test_from_secret_key_defaults() {
        let client = PayMongoClient::from_secret_key("sk_test_abc123").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(client.retries(), DEFAULT_RETRIES);
    }

    #[test]
    fn test_zero_timeout_accepted() {
        let client = PayMongoClient::new("sk_test_abc123", DEFAULT_BASE_URL, 0, 0).unwrap();
        assert!(client.timeout().is_zero());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let client = PayMongoClient::from_secret_key("sk_test_topsecret").unwrap();
        assert!(!format!("{:?}", client).contains("topsecret"));
    }

    #[test]
    fn test_unwrap_data() {
        assert_eq!(
            unwrap_data(r#"{"data":{"id":"cust_abc123"}}"#),
            json!({"id": "cust_abc123"})
        );
        assert_eq!(unwrap_data(r#"{"data":[]}"#), json!([]));
        assert_eq!(unwrap_data(r#"{"data":null}"#), json!({}));
        assert_eq!(unwrap_data(r#"{"other":1}"#), json!({}));
        assert_eq!(unwrap_data("not json"), json!({}));
        assert_eq!(unwrap_data(""), json!({}));
    }
}
