//! # Authentication Library
//!
//! Scoped operator API tokens for internal endpoints and payload-signature
//! verification for vendor callbacks.

pub mod signature;
pub mod token;

// Re-export commonly used types
pub use signature::{sign_payload, verify_public_key, verify_signature};
pub use token::{
    issue_operator_token, verify_operator_token, Claims, SCOPE_LAUNCH, SCOPE_REPORTS,
};
