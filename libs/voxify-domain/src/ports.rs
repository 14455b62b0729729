//! Ports (trait definitions) for external dependencies
//!
//! Convenience re-exports of the port traits defined by each domain module.
//! Following hexagonal architecture, the domain defines what it needs, and
//! the infrastructure provides implementations.

pub use crate::billing::ports::CheckoutGateway;
pub use crate::conversion::ports::{ImageGenerationApi, StageObserver, VisionApi};
