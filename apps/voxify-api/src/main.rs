//! Voxify API - Photo Conversion Service
//!
//! HTTP service turning uploaded photos into blocky voxel-style characters
//! via chained vision and image-generation API calls, with Stripe checkout
//! for paid conversion packs.

mod config;
mod dto;
mod events;
mod handlers;
mod middleware;
mod routes;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voxify_domain::billing::BillingService;
use voxify_domain::conversion::{ConversionConfig, ConversionService};
use voxify_openai::{OpenAiClient, OpenAiConfig};
use voxify_stripe::{StripeCheckout, StripeConfig};

use crate::config::AppConfig;
use crate::events::TracingStageObserver;
use crate::middleware::rate_limit::RateLimiter;

/// Conversion service wired to the OpenAI adapter (both ports)
pub type AppConversionService =
    ConversionService<OpenAiClient, OpenAiClient, TracingStageObserver>;

/// Billing service wired to the Stripe adapter
pub type AppBillingService = BillingService<StripeCheckout>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversion: Arc<AppConversionService>,
    pub billing: Arc<AppBillingService>,
    pub limiter: RateLimiter,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Voxify API server");

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("configuration error")?;
    config.log_summary();

    // Wire the conversion pipeline to the OpenAI adapter
    let openai = OpenAiClient::new(
        OpenAiConfig::new(&config.openai_api_key).with_base_url(&config.openai_base_url),
    );
    let conversion = ConversionService::new(
        openai.clone(),
        openai,
        TracingStageObserver,
        ConversionConfig::default(),
    );

    // Wire billing to the Stripe adapter
    let stripe = StripeCheckout::new(
        StripeConfig::new(&config.stripe_secret_key).with_base_url(&config.stripe_base_url),
    );
    let billing = BillingService::new(stripe, config.client_url.clone());

    let limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max_requests);

    // Create shared application state
    let state = AppState {
        conversion: Arc::new(conversion),
        billing: Arc::new(billing),
        limiter,
        config: Arc::new(config),
    };

    // Build HTTP router
    let app = routes::create_router(state.clone());

    let addr = format!("{}:{}", state.config.host, state.config.port);
    info!(addr = %addr, "Starting HTTP server");

    // Start server; connect info feeds the per-IP rate limiter
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
