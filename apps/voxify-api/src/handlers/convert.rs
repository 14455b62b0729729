//! Conversion handler
//!
//! Validates the request before the pipeline runs, then maps the domain
//! outcome onto the wire: upstream statuses pass through, validation
//! failures answer 400 with the API's own messages, and timing rides along
//! on failures as well as successes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{error, info, warn};
use voxify_domain::conversion::OutputSize;

use crate::{
    dto::convert::{ConvertRequest, ConvertResponse, ErrorResponse, TimingDto},
    AppState,
};

/// Handle conversion requests
#[utoipa::path(
    post,
    path = "/api/convert",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Photo converted successfully", body = ConvertResponse),
        (status = 400, description = "Bad request - missing, malformed, or oversized image", body = ErrorResponse),
        (status = 429, description = "Upstream rate limit persisted through retries", body = ErrorResponse),
        (status = 500, description = "Pipeline or upstream failure", body = ErrorResponse)
    ),
    tag = "conversion"
)]
pub async fn convert_handler(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Response {
    let (raw_image, size) = match validate_request(&payload, state.config.max_file_size) {
        Ok(validated) => validated,
        Err(message) => {
            warn!(%message, "Rejected conversion request");
            return error_response(StatusCode::BAD_REQUEST, message, None);
        }
    };

    info!(
        image_bytes = raw_image.len(),
        size = %size,
        has_prompt = payload.prompt.is_some(),
        "Received conversion request"
    );

    match state
        .conversion
        .convert(&raw_image, payload.prompt.as_deref(), size)
        .await
    {
        Ok(result) => {
            info!(timing_ms = result.timing.total, "Conversion succeeded");
            (StatusCode::OK, Json(ConvertResponse::from(result))).into_response()
        }
        Err(failure) => {
            error!(
                error = %failure,
                timing_ms = failure.timing.total,
                "Conversion failed"
            );
            let status = StatusCode::from_u16(failure.error.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(status, failure.error.to_string(), Some(failure.timing.into()))
        }
    }
}

/// Check the request against the inbound contract before any work happens.
///
/// Returns the decoded image bytes and the resolved output size, or the
/// message the 400 response should carry.
fn validate_request(
    payload: &ConvertRequest,
    max_file_size: usize,
) -> Result<(Vec<u8>, OutputSize), String> {
    let image = match payload.image.as_deref() {
        Some(image) if !image.is_empty() => image,
        _ => return Err("Image is required".to_string()),
    };

    let raw = STANDARD
        .decode(image)
        .map_err(|_| "Invalid base64 image format".to_string())?;

    if raw.len() > max_file_size {
        return Err("Image size exceeds maximum allowed size".to_string());
    }

    let size = match payload.size.as_deref() {
        None => OutputSize::default(),
        Some(size) => size
            .parse()
            .map_err(|_| "Invalid size parameter".to_string())?,
    };

    Ok((raw, size))
}

fn error_response(status: StatusCode, message: String, timing: Option<TimingDto>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
            timing,
        }),
    )
        .into_response()
}
