//! Fixed-window rate limiting per client IP
//!
//! The limiter is the only cross-request state in the service. Windows are
//! tracked in memory; a restart resets them, which is acceptable for an
//! abuse brake (this is not a billing mechanism).

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::AppState;

const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Per-IP fixed-window request counter
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Record a hit for `ip` and report whether it is within budget.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();
        let entry = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }
}

/// Middleware rejecting over-budget clients with 429
pub async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limiter.allow(addr.ip()) {
        warn!(
            ip = %addr.ip(),
            method = %request.method(),
            path = request.uri().path(),
            "Rate limit reached"
        );
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": RATE_LIMIT_MESSAGE })),
        )
            .into_response();
    }

    next.run(request).await
}
