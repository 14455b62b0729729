//! Port traits for the conversion pipeline
//!
//! The pipeline talks to two external generation APIs and one observability
//! sink, all expressed as traits so the domain stays free of HTTP clients
//! and so tests can count calls with in-memory implementations.
//!
//! ## Static Dispatch
//!
//! Ports use native `impl Future` return types instead of `async_trait` for
//! static dispatch; the compiler monomorphizes each implementation.

use std::future::Future;

use crate::conversion::entity::{OutputSize, Stage};
use crate::conversion::error::ConversionError;

/// Port for the vision-capable description API
pub trait VisionApi: Send + Sync {
    /// Describe a prepared PNG according to the given styling instruction.
    ///
    /// # Arguments
    ///
    /// * `image_png` - Normalized PNG bytes (see [`crate::conversion::prepare_image`])
    /// * `instruction` - The styling instruction sent alongside the image
    ///
    /// # Returns
    ///
    /// The free-text description, untruncated
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Upstream` with the observed HTTP status on
    /// API failure, timeout, or transport error
    fn describe_image(
        &self,
        image_png: &[u8],
        instruction: &str,
    ) -> impl Future<Output = Result<String, ConversionError>> + Send;
}

/// Port for the image generation API
pub trait ImageGenerationApi: Send + Sync {
    /// Generate a single styled image from a text prompt.
    ///
    /// # Arguments
    ///
    /// * `prompt` - Full generation prompt (prefix + truncated description)
    /// * `size` - Requested output dimensions
    ///
    /// # Returns
    ///
    /// The URL of the generated image, hosted by the provider
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Upstream` with the observed HTTP status on
    /// API failure, timeout, or transport error
    fn generate_image(
        &self,
        prompt: &str,
        size: OutputSize,
    ) -> impl Future<Output = Result<String, ConversionError>> + Send;
}

/// Port for stage-completion progress events
///
/// Implementations must be fire-and-forget: they may log or meter but must
/// never block the pipeline or return a failure.
pub trait StageObserver: Send + Sync {
    /// Called after each pipeline stage completes successfully.
    ///
    /// * `stage` - The stage that just finished
    /// * `elapsed_ms` - Wall-clock time since the conversion started
    fn stage_complete(&self, stage: Stage, elapsed_ms: u64);
}

/// Observer that drops all events; useful in tests and tools
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn stage_complete(&self, _stage: Stage, _elapsed_ms: u64) {}
}
