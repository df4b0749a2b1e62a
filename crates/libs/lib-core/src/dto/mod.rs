//! # Data Transfer Objects (DTOs)
//!
//! Typed request/response structures for every external contract the gateway
//! speaks: the internal launch API and the per-vendor callback schemas.
//!
//! Each vendor dictates its own field names and casing; the DTOs pin those
//! contracts down with serde so a missing or mistyped field is rejected at
//! the controller boundary, before any orchestrator call.

use rust_decimal::Decimal;

pub mod hg5;
pub mod launch;
pub mod ors;

pub use hg5::*;
pub use launch::*;
pub use ors::*;

/// Render a monetary amount the way every vendor contract expects it: a
/// decimal string with exactly 2 fraction digits.
pub fn format_amount(amount: Decimal) -> String {
    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    amount.to_string()
}
