//! # Operator API Tokens
//!
//! Issues and verifies the scoped bearer tokens that guard the
//! operator-facing endpoints (launch, order and record queries). Tokens are
//! JWTs pinned to this gateway as issuer; a token signed for any other
//! service fails verification even with the same secret. Vendor callbacks
//! never carry these tokens, they authenticate in the orchestrators with
//! game-session tokens or payload signatures.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token this gateway signs.
pub const TOKEN_ISSUER: &str = "provider-gateway";

/// Scope required to launch game sessions.
pub const SCOPE_LAUNCH: &str = "launch";

/// Scope required for order, record and history queries.
pub const SCOPE_REPORTS: &str = "reports";

/// Claims carried by an operator API token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator account id
    pub sub: String,
    /// Operator platform code (e.g. "ops-portal")
    pub operator: String,
    /// Granted scopes ([`SCOPE_LAUNCH`], [`SCOPE_REPORTS`])
    pub scopes: Vec<String>,
    /// Issuer, always [`TOKEN_ISSUER`]
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Whether the token grants a scope.
    pub fn allows(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Issue a scoped operator token.
pub fn issue_operator_token(
    operator_id: &str,
    operator: &str,
    scopes: &[&str],
    secret: &str,
    expiration_hours: i64,
) -> Result<String, String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours);

    let claims = Claims {
        sub: operator_id.to_string(),
        operator: operator.to_string(),
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        iss: TOKEN_ISSUER.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to issue token: {}", e))
}

/// Verify an operator token: signature, expiry and issuer.
pub fn verify_operator_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("Failed to verify token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-must-be-at-least-32-chars-long!";

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let token =
            issue_operator_token("op-7", "ops-portal", &[SCOPE_LAUNCH, SCOPE_REPORTS], SECRET, 24)
                .expect("token issue should succeed");
        let claims = verify_operator_token(&token, SECRET).expect("token verify should succeed");

        assert_eq!(claims.sub, "op-7");
        assert_eq!(claims.operator, "ops-portal");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(claims.allows(SCOPE_LAUNCH));
        assert!(claims.allows(SCOPE_REPORTS));
    }

    #[test]
    fn test_scopes_are_not_implied() {
        let token = issue_operator_token("op-7", "ops-portal", &[SCOPE_LAUNCH], SECRET, 24)
            .expect("token issue should succeed");
        let claims = verify_operator_token(&token, SECRET).expect("token verify should succeed");

        assert!(claims.allows(SCOPE_LAUNCH));
        assert!(!claims.allows(SCOPE_REPORTS));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue_operator_token("op-7", "ops-portal", &[SCOPE_LAUNCH], SECRET, 24)
            .expect("token issue should succeed");

        assert!(verify_operator_token(&token, "another-secret-that-is-long-enough!").is_err());
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        // Same secret, same claim shape, but signed for a different service.
        let claims = Claims {
            sub: "op-7".to_string(),
            operator: "ops-portal".to_string(),
            scopes: vec![SCOPE_LAUNCH.to_string()],
            iss: "some-other-service".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(verify_operator_token(&token, SECRET).is_err());
    }
}
