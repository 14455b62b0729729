//! Stripe Checkout Gateway Implementation
//!
//! Translates domain checkout operations into Stripe Checkout Session API
//! calls and converts Stripe errors to domain errors. Parameter building
//! and response parsing are pure functions with their own tests.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use voxify_domain::billing::{BillingError, CheckoutSession, PaymentStatus, Plan, SessionStatus};
use voxify_domain::ports::CheckoutGateway;

/// Configuration for the Stripe client
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// API root, e.g. `https://api.stripe.com`
    pub base_url: String,
    pub call_timeout: Duration,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: "https://api.stripe.com".to_string(),
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Stripe-backed implementation of the checkout port
#[derive(Clone)]
pub struct StripeCheckout {
    http: reqwest::Client,
    config: StripeConfig,
}

impl StripeCheckout {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}/v1/checkout/sessions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl CheckoutGateway for StripeCheckout {
    #[instrument(skip(self, success_url, cancel_url), fields(plan = %plan))]
    fn create_session(
        &self,
        plan: Plan,
        success_url: &str,
        cancel_url: &str,
    ) -> impl std::future::Future<Output = Result<CheckoutSession, BillingError>> + Send {
        let params = checkout_session_params(plan, success_url, cancel_url);

        async move {
            debug!("Creating Stripe checkout session");

            let response = self
                .http
                .post(self.sessions_url())
                .bearer_auth(&self.config.secret_key)
                .form(&params)
                .timeout(self.config.call_timeout)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if !status.is_success() {
                warn!(status = status.as_u16(), "Stripe session creation failed");
                return Err(BillingError::provider(extract_error_message(&body)));
            }

            let session = parse_session(&body)?;
            let url = session.url.ok_or_else(|| {
                BillingError::provider("checkout session response carried no redirect URL")
            })?;

            info!(session_id = %session.id, "Stripe checkout session created");
            Ok(CheckoutSession {
                id: session.id,
                url,
            })
        }
    }

    #[instrument(skip(self))]
    fn retrieve_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<SessionStatus, BillingError>> + Send {
        let url = format!("{}/{}", self.sessions_url(), session_id);

        async move {
            debug!("Retrieving Stripe checkout session");

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.secret_key)
                .timeout(self.config.call_timeout)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                warn!("Stripe session not found");
                return Err(BillingError::SessionNotFound);
            }
            if !status.is_success() {
                warn!(status = status.as_u16(), "Stripe session retrieval failed");
                return Err(BillingError::provider(extract_error_message(&body)));
            }

            let session = parse_session(&body)?;
            Ok(session_status(&session))
        }
    }
}

fn transport_error(err: reqwest::Error) -> BillingError {
    error!(error = %err, "Stripe API transport failure");
    BillingError::provider(format!("transport failure: {err}"))
}

/// Build the form parameters for a checkout session: one card payment for
/// the plan's pack, priced inline, with the plan recorded in metadata for
/// later verification.
fn checkout_session_params(
    plan: Plan,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("line_items[0][price_data][currency]", "usd".to_string()),
        (
            "line_items[0][price_data][unit_amount]",
            plan.unit_amount_cents().to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            format!("{} Pack", plan.display_name()),
        ),
        (
            "line_items[0][price_data][product_data][description]",
            format!(
                "Access to convert {} photos to voxel style",
                plan.quantity()
            ),
        ),
        ("success_url", success_url.to_string()),
        ("cancel_url", cancel_url.to_string()),
        ("metadata[plan]", plan.as_str().to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

fn parse_session(body: &str) -> Result<StripeSession, BillingError> {
    serde_json::from_str(body)
        .map_err(|e| BillingError::provider(format!("unexpected session payload: {e}")))
}

fn session_status(session: &StripeSession) -> SessionStatus {
    SessionStatus {
        payment_status: session
            .payment_status
            .as_deref()
            .map(PaymentStatus::parse)
            .unwrap_or(PaymentStatus::Unpaid),
        plan: session
            .metadata
            .get("plan")
            .and_then(|name| name.parse().ok()),
    }
}

/// Pull the human-readable message out of a Stripe error body without
/// echoing the whole payload (which may include request details).
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    "checkout provider rejected the request".to_string()
}
