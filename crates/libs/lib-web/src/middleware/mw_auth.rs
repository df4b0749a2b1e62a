//! # Authentication Middleware
//!
//! Axum middleware validating operator API tokens on the internal
//! (operator-facing) endpoints. Vendor callbacks never pass through here;
//! they authenticate in the orchestrators via session tokens or payload
//! signatures.
//!
//! Handlers extract the verified claims via `Extension<Claims>` and enforce
//! the scope their endpoint requires.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use lib_auth::verify_operator_token;
use lib_core::config::core_config;
use tracing::{debug, warn};

/// Authentication middleware that validates operator tokens.
///
/// Extracts the `Authorization: Bearer <token>` header, verifies the token
/// (signature, expiry, issuer), and injects the `Claims` into request
/// extensions for use by handlers.
///
/// # Behavior
///
/// - **Valid token**: Continues to next middleware/handler with `Claims` in extensions
/// - **Missing/invalid token**: Returns `401 Unauthorized`
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("[AUTH] Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let config = core_config();
    let claims = verify_operator_token(token, &config.jwt_secret).map_err(|e| {
        warn!("[AUTH] Token verification failed: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    debug!(
        "[AUTH] Authenticated operator: {} (account: {}, scopes: {:?})",
        claims.operator, claims.sub, claims.scopes
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
