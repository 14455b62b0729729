//! API routes

pub mod billing;
pub mod convert;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        billing::{BillingErrorResponse, CheckoutRequest, CheckoutResponse, SessionVerifyResponse},
        convert::{ConvertRequest, ConvertResponse, ErrorResponse, TimingDto},
    },
    handlers, middleware, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::convert::convert_handler,
        handlers::billing::create_checkout_session,
        handlers::billing::verify_session,
        handlers::meta::index_handler,
        handlers::meta::test_handler
    ),
    components(
        schemas(
            ConvertRequest,
            ConvertResponse,
            ErrorResponse,
            TimingDto,
            CheckoutRequest,
            CheckoutResponse,
            SessionVerifyResponse,
            BillingErrorResponse
        )
    ),
    tags(
        (name = "conversion", description = "Photo to voxel-style conversion"),
        (name = "billing", description = "Conversion pack checkout"),
        (name = "meta", description = "Service information endpoints")
    ),
    info(
        title = "Voxify API",
        version = "0.1.0",
        description = "Backend for the Voxify photo conversion app",
        contact(
            name = "Voxify Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(convert::routes())
        .merge(billing::routes())
        .route("/", get(handlers::meta::index_handler))
        .route("/api/test", get(handlers::meta::test_handler))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(from_fn(middleware::cors::cors))
        .layer(from_fn(middleware::logging::request_logger))
        .with_state(state)
}
