//! # Vendor Callback Signatures
//!
//! Opaque payload-signature verification for vendor callback endpoints.
//!
//! A vendor signs each callback by hashing an agreed field sequence together
//! with the shared secret; the gateway recomputes the digest and compares.
//! Vendors also present their configured public key in an `X-Public-Key`
//! header, carried base64url.

use lib_utils::b64u_decode;
use sha2::{Digest, Sha256};

/// Compute the signature for an ordered field sequence.
///
/// The digest is lowercase hex SHA-256 over the concatenated parts followed
/// by the shared secret.
pub fn sign_payload(parts: &[&str], secret: &str) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a presented signature against the expected field sequence.
///
/// Comparison runs over the full length regardless of where the first
/// mismatch occurs.
pub fn verify_signature(parts: &[&str], secret: &str, presented: &str) -> bool {
    let expected = sign_payload(parts, secret);
    if expected.len() != presented.len() {
        return false;
    }
    expected
        .bytes()
        .zip(presented.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Check a base64url public-key header against the configured key.
pub fn verify_public_key(presented_b64u: &str, configured: &str) -> bool {
    match b64u_decode(presented_b64u) {
        Ok(bytes) => bytes == configured.as_bytes(),
        Err(_) => false,
    }
}
