//! # Request/Response Logging Middleware
//!
//! Logs every HTTP request and response with method, path, status and
//! duration, correlated by the stamped request ID.
//!
//! Vendor callbacks carry session tokens and signatures in their bodies, so
//! bodies are never logged; sensitive headers are redacted.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Headers that should not be logged.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-public-key"];

/// Request/response logging middleware.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .extensions()
        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let headers: Vec<String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                format!("{}=<redacted>", name)
            } else {
                format!("{}={}", name, value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect();

    tracing::debug!(
        request_id = %request_id,
        "--> {} {} [{}]",
        method,
        path,
        headers.join(", ")
    );

    let res = next.run(req).await;
    let status = res.status();
    let duration = start.elapsed();

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            "<-- {} {} {} ({}ms)",
            method,
            path,
            status,
            duration.as_millis()
        );
    } else {
        info!(
            request_id = %request_id,
            "<-- {} {} {} ({}ms)",
            method,
            path,
            status,
            duration.as_millis()
        );
    }

    res
}
