//! Checkout routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::billing::{create_checkout_session, verify_session},
    AppState,
};

/// Create checkout routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/stripe/create-checkout-session",
            post(create_checkout_session),
        )
        .route("/api/stripe/session/:session_id", get(verify_session))
}
