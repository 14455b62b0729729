//! Billing service - Business logic orchestration
//!
//! Validates plan names, drives checkout creation through the gateway port,
//! and applies the verification rules for completed payments.

use crate::billing::entity::{CreatedCheckout, PaymentStatus, Plan, VerifiedPurchase};
use crate::billing::error::BillingError;
use crate::billing::ports::CheckoutGateway;

/// Placeholder the checkout provider substitutes in redirect URLs; a client
/// echoing it back verbatim never paid.
const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Service for selling conversion packs
pub struct BillingService<C> {
    gateway: C,
    client_url: String,
}

impl<C> BillingService<C>
where
    C: CheckoutGateway,
{
    /// Create a new BillingService.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The checkout provider adapter
    /// * `client_url` - Base URL of the front-end, used to build redirect URLs
    pub fn new(gateway: C, client_url: impl Into<String>) -> Self {
        Self {
            gateway,
            client_url: client_url.into(),
        }
    }

    /// Create a checkout session for the named plan.
    ///
    /// # Errors
    ///
    /// - `BillingError::UnknownPlan` when the name is not in the catalog
    /// - `BillingError::Provider` when the provider call fails
    pub async fn create_checkout(&self, plan_name: &str) -> Result<CreatedCheckout, BillingError> {
        let plan: Plan = plan_name.parse().map_err(|_| BillingError::UnknownPlan)?;

        let success_url = format!(
            "{}/success?session_id={SESSION_ID_PLACEHOLDER}",
            self.client_url
        );
        let session = self
            .gateway
            .create_session(plan, &success_url, &self.client_url)
            .await?;

        Ok(CreatedCheckout {
            url: session.url,
            plan,
        })
    }

    /// Verify a completed payment and report the credits owed.
    ///
    /// Sessions whose payment is anything but `paid` are rejected; a
    /// session with no recoverable plan verifies with zero credits rather
    /// than failing, since the payment itself is genuine.
    ///
    /// # Errors
    ///
    /// - `BillingError::InvalidSessionId` for empty or placeholder IDs
    /// - `BillingError::SessionNotFound` when the provider has no session
    /// - `BillingError::PaymentIncomplete` when the session is unpaid
    pub async fn verify_payment(&self, session_id: &str) -> Result<VerifiedPurchase, BillingError> {
        if session_id.is_empty() || session_id == SESSION_ID_PLACEHOLDER {
            return Err(BillingError::InvalidSessionId);
        }

        let status = self.gateway.retrieve_session(session_id).await?;

        if status.payment_status != PaymentStatus::Paid {
            return Err(BillingError::PaymentIncomplete);
        }

        Ok(VerifiedPurchase {
            plan: status.plan,
            quantity: status.plan.map(|p| p.quantity()).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::entity::{CheckoutSession, SessionStatus};
    use std::sync::{Arc, Mutex};

    // In-memory gateway recording created sessions and replaying a fixed
    // retrieval outcome
    struct StubGateway {
        created: Arc<Mutex<Vec<(Plan, String, String)>>>,
        retrieval: Option<SessionStatus>,
    }

    impl StubGateway {
        fn new(retrieval: Option<SessionStatus>) -> Self {
            Self {
                created: Arc::new(Mutex::new(Vec::new())),
                retrieval,
            }
        }
    }

    impl CheckoutGateway for StubGateway {
        fn create_session(
            &self,
            plan: Plan,
            success_url: &str,
            cancel_url: &str,
        ) -> impl std::future::Future<Output = Result<CheckoutSession, BillingError>> + Send
        {
            self.created
                .lock()
                .unwrap()
                .push((plan, success_url.to_string(), cancel_url.to_string()));
            async move {
                Ok(CheckoutSession {
                    id: "cs_test_123".to_string(),
                    url: "https://checkout.example.com/cs_test_123".to_string(),
                })
            }
        }

        fn retrieve_session(
            &self,
            _session_id: &str,
        ) -> impl std::future::Future<Output = Result<SessionStatus, BillingError>> + Send
        {
            let retrieval = self.retrieval.clone();
            async move { retrieval.ok_or(BillingError::SessionNotFound) }
        }
    }

    #[tokio::test]
    async fn test_create_checkout_for_known_plan() {
        let gateway = StubGateway::new(None);
        let created = gateway.created.clone();
        let service = BillingService::new(gateway, "https://voxify.example.com");

        let checkout = service.create_checkout("starter").await.unwrap();

        assert_eq!(checkout.plan, Plan::Starter);
        assert_eq!(checkout.url, "https://checkout.example.com/cs_test_123");

        let calls = created.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Plan::Starter);
        assert_eq!(
            calls[0].1,
            "https://voxify.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(calls[0].2, "https://voxify.example.com");
    }

    #[tokio::test]
    async fn test_create_checkout_rejects_unknown_plan() {
        let service = BillingService::new(StubGateway::new(None), "https://voxify.example.com");

        let err = service.create_checkout("enterprise").await.unwrap_err();

        assert!(matches!(err, BillingError::UnknownPlan));
    }

    #[tokio::test]
    async fn test_verify_rejects_placeholder_session_id() {
        let service = BillingService::new(StubGateway::new(None), "https://voxify.example.com");

        let err = service
            .verify_payment("{CHECKOUT_SESSION_ID}")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidSessionId));

        let err = service.verify_payment("").await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidSessionId));
    }

    #[tokio::test]
    async fn test_verify_rejects_unpaid_session() {
        let gateway = StubGateway::new(Some(SessionStatus {
            payment_status: PaymentStatus::Unpaid,
            plan: Some(Plan::Value),
        }));
        let service = BillingService::new(gateway, "https://voxify.example.com");

        let err = service.verify_payment("cs_test_123").await.unwrap_err();

        assert!(matches!(err, BillingError::PaymentIncomplete));
    }

    #[tokio::test]
    async fn test_verify_paid_session_reports_credits() {
        let gateway = StubGateway::new(Some(SessionStatus {
            payment_status: PaymentStatus::Paid,
            plan: Some(Plan::Family),
        }));
        let service = BillingService::new(gateway, "https://voxify.example.com");

        let purchase = service.verify_payment("cs_test_123").await.unwrap();

        assert_eq!(purchase.plan, Some(Plan::Family));
        assert_eq!(purchase.quantity, 50);
    }

    #[tokio::test]
    async fn test_verify_paid_session_without_plan_metadata() {
        let gateway = StubGateway::new(Some(SessionStatus {
            payment_status: PaymentStatus::Paid,
            plan: None,
        }));
        let service = BillingService::new(gateway, "https://voxify.example.com");

        let purchase = service.verify_payment("cs_test_123").await.unwrap();

        assert_eq!(purchase.plan, None);
        assert_eq!(purchase.quantity, 0);
    }

    #[tokio::test]
    async fn test_verify_missing_session() {
        let service = BillingService::new(StubGateway::new(None), "https://voxify.example.com");

        let err = service.verify_payment("cs_gone").await.unwrap_err();

        assert!(matches!(err, BillingError::SessionNotFound));
    }
}
