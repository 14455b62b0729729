//! DTOs for the conversion endpoint

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use voxify_domain::conversion::{ConversionResult, Timing};

/// Request body for the conversion endpoint
///
/// `image` and `size` are optional at the type level so validation can
/// answer with the API's own error messages instead of a generic
/// deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertRequest {
    /// Base64-encoded photo (standard alphabet, no data-URI prefix)
    #[schema(example = "iVBORw0KGgoAAAANSUhEUgAA...")]
    pub image: Option<String>,
    /// Styling instruction; a default voxel instruction is used when absent
    #[schema(example = "Describe the main subject of this photo")]
    pub prompt: Option<String>,
    /// Requested output size
    #[schema(example = "1024x1024")]
    pub size: Option<String>,
}

/// Response body for a successful conversion
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertResponse {
    pub success: bool,
    /// URL of the generated image, hosted by the upstream provider
    #[schema(example = "https://images.example.com/generated/abc.png")]
    pub url: String,
    #[schema(example = "success")]
    pub status: String,
    pub timing: TimingDto,
}

impl From<ConversionResult> for ConvertResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            success: true,
            url: result.url,
            status: result.status.as_str().to_string(),
            timing: result.timing.into(),
        }
    }
}

/// Wall-clock timing attached to conversion outcomes
#[derive(Debug, Serialize, ToSchema)]
pub struct TimingDto {
    /// Total elapsed time
    #[schema(example = 8421)]
    pub total: u64,
    /// Unit of `total`
    #[schema(example = "ms")]
    pub unit: String,
}

impl From<Timing> for TimingDto {
    fn from(timing: Timing) -> Self {
        Self {
            total: timing.total,
            unit: timing.unit.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Image is required")]
    pub error: String,
    /// HTTP status code, repeated in the body
    #[schema(example = 400)]
    pub code: u16,
    /// Time spent before the pipeline gave up, when it ran at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingDto>,
}
