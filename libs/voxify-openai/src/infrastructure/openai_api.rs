//! OpenAI API client
//!
//! One client implements both generation ports. Request bodies and response
//! extraction are kept as pure functions so they can be tested without a
//! network.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use voxify_domain::conversion::{ConversionError, OutputSize};
use voxify_domain::ports::{ImageGenerationApi, VisionApi};

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Model used for the vision description step
    pub vision_model: String,
    /// Output-token bound for the description, keeping it short
    pub max_description_tokens: u32,
    /// Hard per-call timeout; expiry is treated as a transient failure
    pub call_timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            vision_model: "gpt-4o".to_string(),
            max_description_tokens: 150,
            call_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// OpenAI-backed implementation of the vision and generation ports
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ConversionError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .timeout(self.config.call_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            warn!(status = status.as_u16(), %message, "OpenAI API call failed");
            return Err(ConversionError::upstream(status.as_u16(), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ConversionError::unexpected_response(e.to_string()))
    }
}

impl VisionApi for OpenAiClient {
    #[instrument(skip(self, image_png, instruction), fields(image_bytes = image_png.len()))]
    fn describe_image(
        &self,
        image_png: &[u8],
        instruction: &str,
    ) -> impl std::future::Future<Output = Result<String, ConversionError>> + Send {
        let body = chat_completion_body(
            &self.config.vision_model,
            instruction,
            image_png,
            self.config.max_description_tokens,
        );

        async move {
            debug!("Requesting style description from vision API");
            let response: ChatCompletionResponse =
                self.post_json("chat/completions", &body).await?;
            let description = first_choice_content(response)?;
            debug!(chars = description.len(), "Vision API returned description");
            Ok(description)
        }
    }
}

impl ImageGenerationApi for OpenAiClient {
    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.len(), size = %size))]
    fn generate_image(
        &self,
        prompt: &str,
        size: OutputSize,
    ) -> impl std::future::Future<Output = Result<String, ConversionError>> + Send {
        let body = image_generation_body(prompt, size);

        async move {
            debug!("Requesting styled image from generation API");
            let response: ImageGenerationResponse =
                self.post_json("images/generations", &body).await?;
            let url = first_image_url(response)?;
            debug!("Generation API returned image URL");
            Ok(url)
        }
    }
}

/// Map a transport-level failure to a domain error.
///
/// Timeouts and connection failures carry no upstream status; they are
/// reported as 503 so the retry wrapper treats them as transient.
fn transport_error(err: reqwest::Error) -> ConversionError {
    if err.is_timeout() {
        error!("OpenAI API call timed out");
        ConversionError::upstream(503, "upstream call timed out")
    } else {
        error!(error = %err, "OpenAI API transport failure");
        ConversionError::upstream(503, format!("upstream transport failure: {err}"))
    }
}

/// Build the chat-completions body for the description step: the styling
/// instruction plus the prepared PNG embedded as a data URI.
fn chat_completion_body(model: &str, instruction: &str, image_png: &[u8], max_tokens: u32) -> Value {
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(image_png));
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": instruction },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }
        ],
        "max_tokens": max_tokens,
    })
}

/// Build the images body: a single image at the literal requested size.
fn image_generation_body(prompt: &str, size: OutputSize) -> Value {
    json!({
        "prompt": prompt,
        "n": 1,
        "size": size.as_str(),
    })
}

/// Pull a human-readable message out of an OpenAI error body, falling back
/// to the raw body when it isn't the documented shape.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail provided".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, ConversionError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ConversionError::unexpected_response("response contained no choices"))
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

fn first_image_url(response: ImageGenerationResponse) -> Result<String, ConversionError> {
    response
        .data
        .into_iter()
        .next()
        .map(|image| image.url)
        .ok_or_else(|| ConversionError::unexpected_response("response contained no images"))
}
