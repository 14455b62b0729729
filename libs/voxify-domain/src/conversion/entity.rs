//! Domain entities for the conversion pipeline
//!
//! All entities here are transient and single-request-scoped. A conversion
//! owns its data from ingestion to response; nothing is cached or shared
//! across requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Fixed lead-in phrase prepended to the truncated description before it is
/// submitted to the image generation API.
pub const GENERATION_PROMPT_PREFIX: &str = "A blocky voxel character based on this description: ";

/// Hard character budget for the full generation prompt (prefix included),
/// imposed by the upstream image generation API.
pub const MAX_GENERATION_PROMPT_CHARS: usize = 1000;

/// Styling instruction used when the caller does not supply one.
pub const DEFAULT_STYLE_INSTRUCTION: &str = "Provide a concise description of the main subject \
    in this image as a blocky voxel character with pixelated features, cubic limbs, and a \
    simplified color palette. Include specific details about their appearance, clothing, \
    accessories, and any objects they are holding or interacting with. Do not provide \
    instructions or steps.";

/// Requested output dimensions for the generated image
///
/// The upstream generation API accepts a closed set of square sizes; the
/// wire representation is the literal size string (e.g. `"1024x1024"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSize {
    #[serde(rename = "256x256")]
    Small,
    #[serde(rename = "512x512")]
    Medium,
    #[serde(rename = "1024x1024")]
    Large,
}

impl OutputSize {
    /// The literal size string sent to the generation API
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Small => "256x256",
            OutputSize::Medium => "512x512",
            OutputSize::Large => "1024x1024",
        }
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        OutputSize::Large
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a size string is outside the accepted enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOutputSize(pub String);

impl fmt::Display for InvalidOutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid output size: {}", self.0)
    }
}

impl std::error::Error for InvalidOutputSize {}

impl FromStr for OutputSize {
    type Err = InvalidOutputSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "256x256" => Ok(OutputSize::Small),
            "512x512" => Ok(OutputSize::Medium),
            "1024x1024" => Ok(OutputSize::Large),
            other => Err(InvalidOutputSize(other.to_string())),
        }
    }
}

/// A decoded, normalized image ready for submission to the vision API
///
/// Invariants (enforced by [`crate::conversion::prepare_image`]):
/// - PNG encoded, fixed square dimensions
/// - at most 4 MiB
#[derive(Debug, Clone)]
pub struct PreparedImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
    source_width: u32,
    source_height: u32,
}

impl PreparedImage {
    pub(crate) fn new(
        png: Vec<u8>,
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    ) -> Self {
        Self {
            png,
            width,
            height,
            source_width,
            source_height,
        }
    }

    /// The normalized PNG bytes
    pub fn as_png(&self) -> &[u8] {
        &self.png
    }

    /// Size of the normalized PNG in bytes
    pub fn byte_len(&self) -> usize {
        self.png.len()
    }

    /// Normalized dimensions (always square)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Intrinsic dimensions of the uploaded image, kept for diagnostics
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }
}

/// A natural-language description of the photo, produced once per request
/// by the vision API and mutated only by truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescription {
    text: String,
}

impl StyleDescription {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character budget left for the description once the generation prompt
    /// prefix is accounted for.
    pub fn max_chars() -> usize {
        MAX_GENERATION_PROMPT_CHARS - GENERATION_PROMPT_PREFIX.len()
    }

    /// Truncate the description to the generation prompt budget.
    ///
    /// This is a hard character-count cut, not token-aware; it may land
    /// mid-word. Idempotent: descriptions already within budget are left
    /// untouched.
    pub fn truncate_to_budget(&mut self) {
        let budget = Self::max_chars();
        if self.text.chars().count() > budget {
            self.text = self.text.chars().take(budget).collect();
        }
    }

    /// The full prompt submitted to the image generation API.
    ///
    /// Call [`Self::truncate_to_budget`] first to guarantee the result stays
    /// within [`MAX_GENERATION_PROMPT_CHARS`].
    pub fn generation_prompt(&self) -> String {
        format!("{GENERATION_PROMPT_PREFIX}{}", self.text)
    }
}

/// Wall-clock timing attached to conversion outcomes
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Timing {
    /// Total elapsed time
    pub total: u64,
    /// Unit of the `total` field (always milliseconds)
    pub unit: &'static str,
}

impl Timing {
    pub fn from_millis(total: u64) -> Self {
        Self { total, unit: "ms" }
    }

    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self::from_millis(elapsed.as_millis() as u64)
    }
}

/// Terminal status of a successful conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Success,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Success => "success",
        }
    }
}

/// Terminal value returned to the caller on success
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// URL of the generated image, hosted by the upstream provider
    pub url: String,
    pub status: ConversionStatus,
    pub timing: Timing,
}

/// Pipeline stages, in execution order
///
/// A request moves strictly forward: Preparing -> Describing -> Generating,
/// ending in success or failure. Stage completions are reported through the
/// [`crate::ports::StageObserver`] port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Describing,
    Generating,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preparing => "preparing",
            Stage::Describing => "describing",
            Stage::Generating => "generating",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_size_round_trip() {
        for (text, size) in [
            ("256x256", OutputSize::Small),
            ("512x512", OutputSize::Medium),
            ("1024x1024", OutputSize::Large),
        ] {
            assert_eq!(text.parse::<OutputSize>().unwrap(), size);
            assert_eq!(size.as_str(), text);
        }
    }

    #[test]
    fn test_output_size_rejects_unknown_values() {
        assert!("640x480".parse::<OutputSize>().is_err());
        assert!("".parse::<OutputSize>().is_err());
        assert!("1024".parse::<OutputSize>().is_err());
    }

    #[test]
    fn test_output_size_default_is_large() {
        assert_eq!(OutputSize::default(), OutputSize::Large);
    }

    #[test]
    fn test_truncation_is_noop_within_budget() {
        let mut description = StyleDescription::new("a short description");
        description.truncate_to_budget();
        assert_eq!(description.text(), "a short description");
    }

    #[test]
    fn test_truncation_cuts_to_exact_budget() {
        let mut description = StyleDescription::new("x".repeat(2000));
        description.truncate_to_budget();
        assert_eq!(description.text().chars().count(), StyleDescription::max_chars());
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let mut description = StyleDescription::new("y".repeat(1500));
        description.truncate_to_budget();
        let once = description.clone();
        description.truncate_to_budget();
        assert_eq!(description, once);
    }

    #[test]
    fn test_generation_prompt_stays_within_limit() {
        let mut description = StyleDescription::new("z".repeat(5000));
        description.truncate_to_budget();
        let prompt = description.generation_prompt();
        assert_eq!(prompt.chars().count(), MAX_GENERATION_PROMPT_CHARS);
        assert!(prompt.starts_with(GENERATION_PROMPT_PREFIX));
    }

    #[test]
    fn test_truncation_handles_multibyte_text() {
        let mut description = StyleDescription::new("é".repeat(1200));
        description.truncate_to_budget();
        assert_eq!(description.text().chars().count(), StyleDescription::max_chars());
    }

    #[test]
    fn test_timing_from_elapsed() {
        let timing = Timing::from_elapsed(Duration::from_millis(1234));
        assert_eq!(timing.total, 1234);
        assert_eq!(timing.unit, "ms");
    }
}
