//! # Voxify Domain Layer
//!
//! This crate contains the pure business logic and domain models for the
//! Voxify image conversion service. It follows hexagonal architecture
//! principles:
//!
//! - **Entities**: Core domain models (PreparedImage, StyleDescription, plans)
//! - **Ports**: Trait definitions for external dependencies (vision API,
//!   image generation API, checkout gateway, stage observer)
//! - **Services**: Business logic orchestration (conversion pipeline, billing)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (HTTP clients,
//! provider SDKs, web frameworks). All external dependencies are expressed as
//! traits (ports) that are implemented by adapter layers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use voxify_domain::conversion::{ConversionService, OutputSize};
//! use voxify_domain::ports::{VisionApi, ImageGenerationApi, StageObserver};
//!
//! // The service is generic over any port implementations
//! async fn example<V, G, O>(service: ConversionService<V, G, O>, photo: Vec<u8>)
//! where
//!     V: VisionApi,
//!     G: ImageGenerationApi,
//!     O: StageObserver,
//! {
//!     let result = service.convert(&photo, None, OutputSize::Large).await.unwrap();
//!     println!("Styled image: {}", result.url);
//! }
//! ```

pub mod billing;
pub mod conversion;
pub mod ports;

// Re-export commonly used types
pub use billing::{BillingError, BillingService, Plan};
pub use conversion::{
    ConversionConfig, ConversionError, ConversionFailure, ConversionResult, ConversionService,
    OutputSize, Stage,
};
