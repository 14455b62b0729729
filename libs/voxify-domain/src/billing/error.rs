//! Domain errors for billing operations

use thiserror::Error;

/// Errors that can occur while creating or verifying a checkout
#[derive(Error, Debug)]
pub enum BillingError {
    /// The requested plan is not in the catalog
    #[error("Invalid plan. Available plans: starter, value, family")]
    UnknownPlan,

    /// The session identifier is empty or a template placeholder
    #[error("Invalid session ID")]
    InvalidSessionId,

    /// The provider has no session with this identifier
    #[error("Session not found")]
    SessionNotFound,

    /// The session exists but the buyer has not paid
    #[error("Payment not completed")]
    PaymentIncomplete,

    /// The checkout provider failed or answered unintelligibly
    #[error("Checkout provider error: {0}")]
    Provider(String),
}

impl BillingError {
    /// Create a provider error with a message
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

/// Result type alias for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_plan_message_lists_catalog() {
        assert_eq!(
            BillingError::UnknownPlan.to_string(),
            "Invalid plan. Available plans: starter, value, family"
        );
    }

    #[test]
    fn test_provider_error_message() {
        let err = BillingError::provider("connection reset");
        assert_eq!(err.to_string(), "Checkout provider error: connection reset");
    }
}
