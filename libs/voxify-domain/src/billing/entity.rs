//! Domain entities for conversion pack billing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A purchasable conversion pack
///
/// The catalog is fixed: three packs trading price against the number of
/// conversions granted. Prices are in USD cents, the unit the checkout
/// provider expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Starter,
    Value,
    Family,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Starter, Plan::Value, Plan::Family];

    /// The wire identifier used in requests and checkout metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Starter => "starter",
            Plan::Value => "value",
            Plan::Family => "family",
        }
    }

    /// Human-facing pack name shown on the checkout page
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Starter => "Starter",
            Plan::Value => "Value",
            Plan::Family => "Family",
        }
    }

    /// Number of conversions the pack grants
    pub fn quantity(&self) -> u32 {
        match self {
            Plan::Starter => 10,
            Plan::Value => 15,
            Plan::Family => 50,
        }
    }

    /// Price in USD cents
    pub fn unit_amount_cents(&self) -> u32 {
        match self {
            Plan::Starter => 499,
            Plan::Value => 999,
            Plan::Family => 2499,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned for a plan name outside the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlanName(pub String);

impl fmt::Display for UnknownPlanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plan: {}", self.0)
    }
}

impl std::error::Error for UnknownPlanName {}

impl FromStr for Plan {
    type Err = UnknownPlanName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Plan::Starter),
            "value" => Ok(Plan::Value),
            "family" => Ok(Plan::Family),
            other => Err(UnknownPlanName(other.to_string())),
        }
    }
}

/// A hosted checkout session created at the provider
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Provider-assigned session identifier
    pub id: String,
    /// URL the buyer is redirected to
    pub url: String,
}

/// Result of creating a checkout, returned to the caller for redirection
#[derive(Debug, Clone)]
pub struct CreatedCheckout {
    pub url: String,
    pub plan: Plan,
}

/// Payment state of a checkout session as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
}

impl PaymentStatus {
    /// Parse the provider's wire value; anything unrecognized is treated as
    /// unpaid.
    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "no_payment_required" => PaymentStatus::NoPaymentRequired,
            _ => PaymentStatus::Unpaid,
        }
    }
}

/// A retrieved checkout session, ready for verification
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub payment_status: PaymentStatus,
    /// Plan recovered from the session metadata, if present
    pub plan: Option<Plan>,
}

/// A verified purchase: the credits the buyer is owed
#[derive(Debug, Clone)]
pub struct VerifiedPurchase {
    pub plan: Option<Plan>,
    pub quantity: u32,
}
