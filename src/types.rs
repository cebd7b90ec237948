//! Core type definitions for the PayMongo API.
//!
//! PayMongo wraps every request and response in a JSON:API style envelope:
//! requests carry `{"data":{"attributes":{...}}}`, successful responses carry
//! `{"data":...}` and failures carry `{"errors":[...]}`. Resource payloads are
//! left as [`serde_json::Value`]; only the attribute bodies whose shape the
//! client itself fixes are typed here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body envelope: `{"data":{"attributes":{...}}}`.
///
/// # Examples
///
/// ```
/// use paymongo_rs::types::RequestEnvelope;
/// use serde_json::json;
///
/// let envelope = RequestEnvelope::new(json!({"amount": 10000}));
/// assert_eq!(
///     serde_json::to_value(&envelope).unwrap(),
///     json!({"data": {"attributes": {"amount": 10000}}})
/// );
/// ```
#[derive(Serialize, Debug, Clone)]
pub struct RequestEnvelope<A> {
    /// Wrapper holding the attributes
    pub data: RequestData<A>,
}

/// The `data` member of a [`RequestEnvelope`].
#[derive(Serialize, Debug, Clone)]
pub struct RequestData<A> {
    /// Caller-supplied resource attributes
    pub attributes: A,
}

impl<A> RequestEnvelope<A> {
    /// Wraps a set of attributes.
    pub fn new(attributes: A) -> Self {
        Self {
            data: RequestData { attributes },
        }
    }
}

/// Response body envelope.
///
/// Exactly one of `data` or `errors` is expected, but both are optional so
/// that any JSON object deserializes.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ResponseEnvelope {
    /// Resource object or list on success
    #[serde(default)]
    pub data: Option<Value>,

    /// Error entries on failure
    #[serde(default)]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// A single entry of the `errors` array.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiErrorEntry {
    /// Machine-readable error code (e.g. `resource_not_found`)
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable explanation
    #[serde(default)]
    pub detail: Option<String>,

    /// Pointer to the offending request attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

/// Attributes for attaching a payment method to a payment intent.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AttachPaymentMethod {
    /// ID of the payment method to attach
    pub payment_method: String,

    /// Client key of the payment intent, required when attaching with a public key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

/// Reason recorded on a refund.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    /// Duplicate charge
    Duplicate,
    /// Fraudulent charge
    Fraudulent,
    /// The customer asked for the refund
    #[default]
    RequestedByCustomer,
    /// Any other reason
    Others,
}

/// Attributes for creating a refund.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRefund {
    /// Amount to refund in centavos
    pub amount: u64,

    /// ID of the payment being refunded
    pub payment_id: String,

    /// Why the refund is issued
    pub reason: RefundReason,
}

/// Attributes for moving a subscription to another plan.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    /// ID of the new plan
    pub plan_id: String,
}

/// Attributes for changing the payment method of a subscription.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangePaymentMethod {
    /// ID of the new payment method
    pub payment_method_id: String,
}

/// Attributes for registering a webhook.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateWebhook {
    /// URL PayMongo will POST events to
    pub url: String,

    /// Event types to subscribe to (e.g. `payment.paid`)
    pub events: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attach_omits_missing_client_key() {
        let attrs = AttachPaymentMethod {
            payment_method: "pm_abc123".to_string(),
            client_key: None,
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({"payment_method": "pm_abc123"})
        );
    }

    #[test]
    fn test_refund_reason_wire_names() {
        assert_eq!(
            serde_json::to_value(RefundReason::RequestedByCustomer).unwrap(),
            json!("requested_by_customer")
        );
        assert_eq!(serde_json::to_value(RefundReason::Others).unwrap(), json!("others"));
        assert_eq!(RefundReason::default(), RefundReason::RequestedByCustomer);
    }

    #[test]
    fn test_response_envelope_accepts_either_shape() {
        let ok: ResponseEnvelope =
            serde_json::from_value(json!({"data": [{"id": "hook_1"}], "has_more": false})).unwrap();
        assert!(ok.data.unwrap().is_array());
        assert!(ok.errors.is_none());

        let failed: ResponseEnvelope = serde_json::from_value(json!({
            "errors": [{"code": "parameter_required", "detail": "amount is required.", "source": {"pointer": "amount"}}]
        }))
        .unwrap();
        let errors = failed.errors.unwrap();
        assert_eq!(errors[0].code.as_deref(), Some("parameter_required"));
        assert!(errors[0].source.is_some());
    }
}
