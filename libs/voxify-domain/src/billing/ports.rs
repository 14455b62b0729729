//! Port trait for the checkout provider
//!
//! The domain defines what it needs from a hosted checkout service; the
//! infrastructure layer supplies the provider-specific implementation.

use std::future::Future;

use crate::billing::entity::{CheckoutSession, Plan, SessionStatus};
use crate::billing::error::BillingError;

/// Port for hosted checkout operations
///
/// ## Implementation Note
///
/// Uses `impl Future` return types for static dispatch, like the conversion
/// ports. Implementations convert provider errors into [`BillingError`].
pub trait CheckoutGateway: Send + Sync {
    /// Create a hosted checkout session for a plan.
    ///
    /// # Arguments
    ///
    /// * `plan` - The pack being purchased
    /// * `success_url` - Where the provider redirects after payment
    /// * `cancel_url` - Where the provider redirects on abandonment
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Provider` when the provider call fails
    fn create_session(
        &self,
        plan: Plan,
        success_url: &str,
        cancel_url: &str,
    ) -> impl Future<Output = Result<CheckoutSession, BillingError>> + Send;

    /// Retrieve a previously created session for payment verification.
    ///
    /// # Errors
    ///
    /// - `BillingError::SessionNotFound` when the provider has no such session
    /// - `BillingError::Provider` for any other provider failure
    fn retrieve_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionStatus, BillingError>> + Send;
}
