//! DTOs for the checkout endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for checkout session creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Plan identifier
    #[schema(example = "starter")]
    pub plan: Option<String>,
}

/// Response body for a created checkout session
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    /// Hosted checkout page the buyer is redirected to
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_123")]
    pub url: String,
    #[schema(example = "starter")]
    pub plan: String,
}

/// Response body for a verified payment
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionVerifyResponse {
    pub success: bool,
    /// Number of conversions the purchase grants
    #[schema(example = 10)]
    pub quantity: u32,
    /// Plan recovered from the session metadata; empty when unavailable
    #[schema(example = "starter")]
    pub plan: String,
}

/// Error response body for checkout endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct BillingErrorResponse {
    pub success: bool,
    /// Error description
    #[schema(example = "Invalid plan. Available plans: starter, value, family")]
    pub error: String,
}
