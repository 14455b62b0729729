//! Billing domain module
//!
//! Users buy conversion packs through a hosted checkout provider. This
//! module owns the plan catalog, the checkout port, and the verification
//! rules for completed payments. No payment state is persisted here; the
//! provider is the source of truth.

mod entity;
mod error;
pub mod ports;
mod service;

pub use entity::{
    CheckoutSession, CreatedCheckout, PaymentStatus, Plan, SessionStatus, UnknownPlanName,
    VerifiedPurchase,
};
pub use error::{BillingError, Result};
pub use service::BillingService;
