//! Service information handlers

use axum::Json;
use serde_json::{json, Value};

/// Service index listing the available endpoints
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information")
    ),
    tag = "meta"
)]
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Voxify API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/convert",
            "/api/stripe/create-checkout-session",
            "/api/stripe/session/{session_id}",
            "/api/test"
        ]
    }))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/test",
    responses(
        (status = 200, description = "Service is reachable")
    ),
    tag = "meta"
)]
pub async fn test_handler() -> Json<Value> {
    Json(json!({
        "message": "API is working!",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
