//! Conversion domain module
//!
//! This module contains the core business logic for the photo-to-voxel
//! conversion pipeline: image preparation, description generation through a
//! vision API, prompt truncation, and styled image generation with bounded
//! retry on transient upstream failures.

mod entity;
mod error;
pub mod ports;
mod prepare;
mod retry;
mod service;

pub use entity::{
    ConversionResult, ConversionStatus, InvalidOutputSize, OutputSize, PreparedImage, Stage,
    StyleDescription, Timing, DEFAULT_STYLE_INSTRUCTION, GENERATION_PROMPT_PREFIX,
    MAX_GENERATION_PROMPT_CHARS,
};
pub use error::{ConversionError, ConversionFailure, Result, StatusClass};
pub use prepare::{prepare_image, MAX_PREPARED_BYTES, PREPARED_DIMENSION};
pub use retry::{retry_transient, MAX_GENERATION_ATTEMPTS};
pub use service::{ConversionConfig, ConversionService};
