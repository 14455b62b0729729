//! Infrastructure implementation of the checkout port

mod checkout;

pub use checkout::{StripeCheckout, StripeConfig};
