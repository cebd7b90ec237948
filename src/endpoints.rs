//! The fixed set of PayMongo endpoints used by the client.

use reqwest::Method;
use std::fmt;

/// A PayMongo API endpoint: HTTP method plus path, with resource IDs
/// substituted verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `POST /customers`
    CreateCustomer,
    /// `GET /customers/{id}`
    GetCustomer(&'a str),
    /// `POST /payment_intents`
    CreatePaymentIntent,
    /// `GET /payment_intents/{id}`
    RetrievePaymentIntent(&'a str),
    /// `POST /payment_methods`
    CreatePaymentMethod,
    /// `POST /payment_intents/{id}/attach`
    AttachPaymentMethod(&'a str),
    /// `POST /checkout_sessions`
    CreateCheckoutSession,
    /// `GET /checkout_sessions/{id}`
    RetrieveCheckoutSession(&'a str),
    /// `GET /payments/{id}`
    RetrievePayment(&'a str),
    /// `POST /refunds`
    CreateRefund,
    /// `POST /subscriptions/plans`
    CreatePlan,
    /// `POST /subscriptions`
    CreateSubscription,
    /// `POST /subscriptions/{id}/cancel`
    CancelSubscription(&'a str),
    /// `POST /subscriptions/{id}/change_plan`
    ChangeSubscriptionPlan(&'a str),
    /// `GET /subscriptions/{id}`
    GetSubscription(&'a str),
    /// `POST /subscriptions/{id}/change_payment_method`
    ChangePaymentMethod(&'a str),
    /// `POST /invoices/{id}/pay`
    PayInvoice(&'a str),
    /// `GET /webhooks`
    ListWebhooks,
    /// `POST /webhooks`
    CreateWebhook,
    /// `POST /webhooks/{id}/enable`
    EnableWebhook(&'a str),
    /// `POST /webhooks/{id}/disable`
    DisableWebhook(&'a str),
}

impl Endpoint<'_> {
    /// HTTP method of this endpoint.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::GetCustomer(_)
            | Endpoint::RetrievePaymentIntent(_)
            | Endpoint::RetrieveCheckoutSession(_)
            | Endpoint::RetrievePayment(_)
            | Endpoint::GetSubscription(_)
            | Endpoint::ListWebhooks => Method::GET,
            _ => Method::POST,
        }
    }

    /// Path relative to the API base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use paymongo_rs::Endpoint;
    ///
    /// assert_eq!(Endpoint::AttachPaymentMethod("pi_123").path(), "/payment_intents/pi_123/attach");
    /// assert_eq!(Endpoint::ListWebhooks.path(), "/webhooks");
    /// ```
    pub fn path(&self) -> String {
        match self {
            Endpoint::CreateCustomer => "/customers".to_string(),
            Endpoint::GetCustomer(id) => format!("/customers/{}", id),
            Endpoint::CreatePaymentIntent => "/payment_intents".to_string(),
            Endpoint::RetrievePaymentIntent(id) => format!("/payment_intents/{}", id),
            Endpoint::CreatePaymentMethod => "/payment_methods".to_string(),
            Endpoint::AttachPaymentMethod(id) => format!("/payment_intents/{}/attach", id),
            Endpoint::CreateCheckoutSession => "/checkout_sessions".to_string(),
            Endpoint::RetrieveCheckoutSession(id) => format!("/checkout_sessions/{}", id),
            Endpoint::RetrievePayment(id) => format!("/payments/{}", id),
            Endpoint::CreateRefund => "/refunds".to_string(),
            Endpoint::CreatePlan => "/subscriptions/plans".to_string(),
            Endpoint::CreateSubscription => "/subscriptions".to_string(),
            Endpoint::CancelSubscription(id) => format!("/subscriptions/{}/cancel", id),
            Endpoint::ChangeSubscriptionPlan(id) => format!("/subscriptions/{}/change_plan", id),
            Endpoint::GetSubscription(id) => format!("/subscriptions/{}", id),
            Endpoint::ChangePaymentMethod(id) => {
                format!("/subscriptions/{}/change_payment_method", id)
            }
            Endpoint::PayInvoice(id) => format!("/invoices/{}/pay", id),
            Endpoint::ListWebhooks | Endpoint::CreateWebhook => "/webhooks".to_string(),
            Endpoint::EnableWebhook(id) => format!("/webhooks/{}/enable", id),
            Endpoint::DisableWebhook(id) => format!("/webhooks/{}/disable", id),
        }
    }

    /// Full URL for this endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_endpoints_use_get() {
        assert_eq!(Endpoint::GetCustomer("cus_1").method(), Method::GET);
        assert_eq!(Endpoint::ListWebhooks.method(), Method::GET);
        assert_eq!(Endpoint::GetSubscription("sub_1").method(), Method::GET);
    }

    #[test]
    fn test_mutating_endpoints_use_post() {
        assert_eq!(Endpoint::CreateWebhook.method(), Method::POST);
        assert_eq!(Endpoint::CancelSubscription("sub_1").method(), Method::POST);
        assert_eq!(Endpoint::PayInvoice("in_1").method(), Method::POST);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::CreatePlan.path(), "/subscriptions/plans");
        assert_eq!(
            Endpoint::ChangePaymentMethod("sub_9").path(),
            "/subscriptions/sub_9/change_payment_method"
        );
        assert_eq!(Endpoint::DisableWebhook("hook_2").path(), "/webhooks/hook_2/disable");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        assert_eq!(
            Endpoint::RetrievePayment("pay_1").url("https://api.paymongo.com/v1/"),
            "https://api.paymongo.com/v1/payments/pay_1"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Endpoint::EnableWebhook("hook_1").to_string(),
            "POST /webhooks/hook_1/enable"
        );
    }
}
