//! # HTTP Request Handlers
//!
//! Axum handlers organized by surface. Handlers validate request shape
//! (typed serde DTOs reject missing or mistyped fields before any
//! orchestrator call), delegate to the services in [`crate::services`], and
//! shape the result into the contract the caller expects.
//!
//! ## Handler Modules
//!
//! - **[`hg5`]**: Hg5 vendor callbacks (auth, balance, bet, settle,
//!   bet-settle, cancel, bonus). Always HTTP 200 with the Hg5 coded
//!   envelope; `"0"` is success.
//! - **[`ors`]**: Ors vendor callbacks (transfer, cancel, balance). Batch
//!   endpoints flatten per-record results into ordered code/balance entries
//!   instead of aborting the batch.
//! - **[`launch`]**: internal operator endpoints (launch, order queries,
//!   transaction history). Guarded by bearer JWTs; errors use `AppError`'s
//!   HTTP envelope.

pub mod hg5;
pub mod launch;
pub mod ors;
