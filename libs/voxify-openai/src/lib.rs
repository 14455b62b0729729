//! # Voxify OpenAI Adapter
//!
//! Implements the conversion domain's [`VisionApi`] and
//! [`ImageGenerationApi`] ports against the OpenAI REST API:
//!
//! - `POST /chat/completions` with an embedded data-URI image for the
//!   description step
//! - `POST /images/generations` for the styled image
//!
//! All provider errors are converted to domain errors carrying the observed
//! HTTP status, so the domain's retry classification works without knowing
//! this adapter exists.
//!
//! [`VisionApi`]: voxify_domain::ports::VisionApi
//! [`ImageGenerationApi`]: voxify_domain::ports::ImageGenerationApi

pub mod infrastructure;

pub use infrastructure::{OpenAiClient, OpenAiConfig};
