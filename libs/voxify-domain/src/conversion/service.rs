//! Conversion service - Business logic orchestration
//!
//! This module sequences the conversion pipeline: prepare the photo,
//! describe it through the vision port, truncate the description to the
//! generation prompt budget, then generate the styled image through the
//! retry wrapper. The service coordinates between domain entities and the
//! external API ports.

use std::time::Instant;

use crate::conversion::entity::{
    ConversionResult, ConversionStatus, OutputSize, Stage, StyleDescription, Timing,
    DEFAULT_STYLE_INSTRUCTION,
};
use crate::conversion::error::{ConversionError, ConversionFailure};
use crate::conversion::ports::{ImageGenerationApi, StageObserver, VisionApi};
use crate::conversion::prepare::prepare_image;
use crate::conversion::retry::{retry_transient, MAX_GENERATION_ATTEMPTS};

/// Configuration for the conversion service
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Total attempt budget for the generation call (default: 3)
    pub max_generation_attempts: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

/// Service that turns an uploaded photo into a styled image URL
///
/// The pipeline is strictly sequential per request:
/// prepare -> describe -> truncate -> generate. Any stage failure aborts the
/// remainder; there is no cross-stage recovery. Only the generation call is
/// retried (see `retry`), matching the behavior the service was tested
/// against.
///
/// ## Static Dispatch
///
/// The service is generic over its port implementations. The compiler
/// generates specialized versions for each concrete type, so the ports cost
/// nothing at runtime.
pub struct ConversionService<V, G, O> {
    vision: V,
    generator: G,
    observer: O,
    config: ConversionConfig,
}

impl<V, G, O> ConversionService<V, G, O>
where
    V: VisionApi,
    G: ImageGenerationApi,
    O: StageObserver,
{
    /// Create a new ConversionService with the given ports and configuration
    pub fn new(vision: V, generator: G, observer: O, config: ConversionConfig) -> Self {
        Self {
            vision,
            generator,
            observer,
            config,
        }
    }

    /// Create a new ConversionService with default configuration
    pub fn with_ports(vision: V, generator: G, observer: O) -> Self {
        Self::new(vision, generator, observer, ConversionConfig::default())
    }

    /// Convert a photo into a styled image.
    ///
    /// # Arguments
    ///
    /// * `raw_image` - The uploaded image bytes, any common raster format
    /// * `style_prompt` - Optional styling instruction; the default voxel
    ///   instruction is used when absent
    /// * `size` - Requested output dimensions
    ///
    /// # Returns
    ///
    /// A [`ConversionResult`] with the generated image URL and wall-clock
    /// timing
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionFailure`] wrapping the stage error together
    /// with the time spent before giving up
    pub async fn convert(
        &self,
        raw_image: &[u8],
        style_prompt: Option<&str>,
        size: OutputSize,
    ) -> Result<ConversionResult, ConversionFailure> {
        let started = Instant::now();

        match self.run_pipeline(raw_image, style_prompt, size, &started).await {
            Ok(url) => Ok(ConversionResult {
                url,
                status: ConversionStatus::Success,
                timing: Timing::from_elapsed(started.elapsed()),
            }),
            Err(error) => Err(ConversionFailure::new(
                error,
                Timing::from_elapsed(started.elapsed()),
            )),
        }
    }

    async fn run_pipeline(
        &self,
        raw_image: &[u8],
        style_prompt: Option<&str>,
        size: OutputSize,
        started: &Instant,
    ) -> Result<String, ConversionError> {
        let prepared = prepare_image(raw_image)?;
        self.notify(Stage::Preparing, started);

        let instruction = style_prompt.unwrap_or(DEFAULT_STYLE_INSTRUCTION);
        let raw_description = self.vision.describe_image(prepared.as_png(), instruction).await?;
        let mut description = StyleDescription::new(raw_description);
        description.truncate_to_budget();
        self.notify(Stage::Describing, started);

        let prompt = description.generation_prompt();
        let url = retry_transient(self.config.max_generation_attempts, || {
            self.generator.generate_image(&prompt, size)
        })
        .await?;
        self.notify(Stage::Generating, started);

        Ok(url)
    }

    fn notify(&self, stage: Stage, started: &Instant) {
        self.observer
            .stage_complete(stage, started.elapsed().as_millis() as u64);
    }

    /// Get the service configuration
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::entity::{GENERATION_PROMPT_PREFIX, MAX_GENERATION_PROMPT_CHARS};
    use crate::conversion::ports::NullObserver;
    use image::{DynamicImage, ImageFormat};
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn test_photo() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(64, 64);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    // In-memory vision port returning a fixed description
    struct StubVision {
        description: String,
        calls: Arc<AtomicU32>,
    }

    impl StubVision {
        fn new(description: impl Into<String>) -> Self {
            Self {
                description: description.into(),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    impl VisionApi for StubVision {
        fn describe_image(
            &self,
            _image_png: &[u8],
            _instruction: &str,
        ) -> impl std::future::Future<Output = Result<String, ConversionError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let description = self.description.clone();
            async move { Ok(description) }
        }
    }

    // Generation port that replays a scripted sequence of outcomes and
    // records every prompt it was given
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, (u16, String)>>>,
        calls: Arc<AtomicU32>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, (u16, String)>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Arc::new(AtomicU32::new(0)),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn succeeding(url: &str) -> Self {
            Self::new(vec![Ok(url.to_string())])
        }
    }

    impl ImageGenerationApi for ScriptedGenerator {
        fn generate_image(
            &self,
            prompt: &str,
            _size: OutputSize,
        ) -> impl std::future::Future<Output = Result<String, ConversionError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("generator called more times than scripted");
            async move { next.map_err(|(status, message)| ConversionError::upstream(status, message)) }
        }
    }

    // Observer recording the order of completed stages
    #[derive(Clone, Default)]
    struct RecordingObserver {
        stages: Arc<Mutex<Vec<Stage>>>,
    }

    impl StageObserver for RecordingObserver {
        fn stage_complete(&self, stage: Stage, _elapsed_ms: u64) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    #[tokio::test]
    async fn test_convert_success_returns_url_and_timing() {
        let generator = ScriptedGenerator::succeeding("https://example.com/image.png");
        let gen_calls = generator.calls.clone();
        let service = ConversionService::with_ports(
            StubVision::new("a knight holding a sword"),
            generator,
            NullObserver,
        );

        let result = service
            .convert(&test_photo(), Some("describe the subject"), OutputSize::Large)
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/image.png");
        assert_eq!(result.status, ConversionStatus::Success);
        assert_eq!(result.timing.unit, "ms");
        assert_eq!(gen_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_convert_reports_stages_in_order() {
        let observer = RecordingObserver::default();
        let stages = observer.stages.clone();
        let service = ConversionService::with_ports(
            StubVision::new("a farmer"),
            ScriptedGenerator::succeeding("https://example.com/image.png"),
            observer,
        );

        service
            .convert(&test_photo(), None, OutputSize::Medium)
            .await
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![Stage::Preparing, Stage::Describing, Stage::Generating]
        );
    }

    #[tokio::test]
    async fn test_retries_rate_limit_then_succeeds() {
        let generator = ScriptedGenerator::new(vec![
            Err((429, "Rate limit exceeded".to_string())),
            Ok("https://example.com/image.png".to_string()),
        ]);
        let gen_calls = generator.calls.clone();
        let service =
            ConversionService::with_ports(StubVision::new("a miner"), generator, NullObserver);

        let result = service
            .convert(&test_photo(), None, OutputSize::Large)
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/image.png");
        assert_eq!(gen_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fails_after_max_retries() {
        let generator = ScriptedGenerator::new(vec![
            Err((429, "Rate limit exceeded".to_string())),
            Err((429, "Rate limit exceeded".to_string())),
            Err((429, "Rate limit exceeded".to_string())),
        ]);
        let gen_calls = generator.calls.clone();
        let service =
            ConversionService::with_ports(StubVision::new("a builder"), generator, NullObserver);

        let failure = service
            .convert(&test_photo(), None, OutputSize::Large)
            .await
            .unwrap_err();

        assert_eq!(gen_calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            failure.to_string(),
            "Failed to convert image after 3 attempts"
        );
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let generator = ScriptedGenerator::new(vec![Err((400, "Invalid input".to_string()))]);
        let gen_calls = generator.calls.clone();
        let service =
            ConversionService::with_ports(StubVision::new("a sailor"), generator, NullObserver);

        let failure = service
            .convert(&test_photo(), None, OutputSize::Large)
            .await
            .unwrap_err();

        assert_eq!(gen_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            failure.to_string(),
            "Failed to convert image after 1 attempts"
        );
    }

    #[tokio::test]
    async fn test_preparation_failure_skips_api_calls() {
        let vision = StubVision::new("never used");
        let vision_calls = vision.calls.clone();
        let generator = ScriptedGenerator::new(vec![]);
        let gen_calls = generator.calls.clone();
        let service = ConversionService::with_ports(vision, generator, NullObserver);

        let failure = service
            .convert(b"not an image", None, OutputSize::Large)
            .await
            .unwrap_err();

        assert!(matches!(failure.error, ConversionError::Preparation(_)));
        assert_eq!(vision_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gen_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_long_description_is_truncated_before_generation() {
        let generator = ScriptedGenerator::succeeding("https://example.com/image.png");
        let prompts = generator.prompts.clone();
        let service = ConversionService::with_ports(
            StubVision::new("w".repeat(3000)),
            generator,
            NullObserver,
        );

        service
            .convert(&test_photo(), None, OutputSize::Large)
            .await
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].chars().count(), MAX_GENERATION_PROMPT_CHARS);
        assert!(prompts[0].starts_with(GENERATION_PROMPT_PREFIX));
    }

    #[tokio::test]
    async fn test_failure_carries_timing() {
        let generator = ScriptedGenerator::new(vec![
            Err((500, "boom".to_string())),
            Err((502, "bad gateway".to_string())),
            Err((503, "unavailable".to_string())),
        ]);
        let service =
            ConversionService::with_ports(StubVision::new("a chef"), generator, NullObserver);

        let failure = service
            .convert(&test_photo(), None, OutputSize::Large)
            .await
            .unwrap_err();

        assert_eq!(failure.timing.unit, "ms");
    }
}
