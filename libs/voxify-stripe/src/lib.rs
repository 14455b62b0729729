//! # Voxify Stripe Adapter
//!
//! Implements the billing domain's [`CheckoutGateway`] port against the
//! Stripe REST API. Stripe takes `application/x-www-form-urlencoded`
//! requests with bracketed nested keys, so session parameters are built as
//! flat key/value pairs rather than JSON.
//!
//! [`CheckoutGateway`]: voxify_domain::ports::CheckoutGateway

pub mod infrastructure;

pub use infrastructure::{StripeCheckout, StripeConfig};
