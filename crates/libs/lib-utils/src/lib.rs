//! # Utilities Library
//!
//! Shared utility functions for base64 encoding, environment variables, time, and validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64u_decode, b64u_encode};
pub use envs::{get_env, get_env_or, get_env_parse_or};
pub use time::{format_time, now_utc, parse_utc, platform_time_from_epoch_ms};
pub use validation::{validate_not_empty, validate_stake, validate_win_amount};
