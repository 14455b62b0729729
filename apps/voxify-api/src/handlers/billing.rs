//! Checkout handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};
use voxify_domain::billing::BillingError;

use crate::{
    dto::billing::{BillingErrorResponse, CheckoutRequest, CheckoutResponse, SessionVerifyResponse},
    AppState,
};

/// Create a hosted checkout session for a conversion pack
#[utoipa::path(
    post,
    path = "/api/stripe/create-checkout-session",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Unknown plan", body = BillingErrorResponse),
        (status = 500, description = "Checkout provider failure", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Response {
    let plan_name = payload.plan.unwrap_or_default();
    info!(plan = %plan_name, "Creating checkout session");

    match state.billing.create_checkout(&plan_name).await {
        Ok(created) => {
            info!(plan = %created.plan, "Checkout session created");
            (
                StatusCode::OK,
                Json(CheckoutResponse {
                    success: true,
                    url: created.url,
                    plan: created.plan.as_str().to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, plan = %plan_name, "Failed to create checkout session");
            billing_error_response(err)
        }
    }
}

/// Verify a completed payment and report the credits owed
#[utoipa::path(
    get,
    path = "/api/stripe/session/{session_id}",
    params(
        ("session_id" = String, Path, description = "Checkout session identifier")
    ),
    responses(
        (status = 200, description = "Payment verified", body = SessionVerifyResponse),
        (status = 400, description = "Invalid session ID or payment not completed", body = BillingErrorResponse),
        (status = 404, description = "Session not found", body = BillingErrorResponse),
        (status = 500, description = "Checkout provider failure", body = BillingErrorResponse)
    ),
    tag = "billing"
)]
pub async fn verify_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    info!("Verifying payment session");

    match state.billing.verify_payment(&session_id).await {
        Ok(purchase) => {
            info!(quantity = purchase.quantity, "Payment verification successful");
            (
                StatusCode::OK,
                Json(SessionVerifyResponse {
                    success: true,
                    quantity: purchase.quantity,
                    plan: purchase
                        .plan
                        .map(|plan| plan.as_str().to_string())
                        .unwrap_or_default(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(error = %err, "Payment verification failed");
            billing_error_response(err)
        }
    }
}

fn billing_error_response(err: BillingError) -> Response {
    let status = match &err {
        BillingError::UnknownPlan
        | BillingError::InvalidSessionId
        | BillingError::PaymentIncomplete => StatusCode::BAD_REQUEST,
        BillingError::SessionNotFound => StatusCode::NOT_FOUND,
        BillingError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(BillingErrorResponse {
            success: false,
            error: err.to_string(),
        }),
    )
        .into_response()
}
