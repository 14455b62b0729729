//! Conversion routes

use axum::{routing::post, Router};

use crate::{handlers::convert::convert_handler, AppState};

/// Create conversion routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/convert", post(convert_handler))
}
