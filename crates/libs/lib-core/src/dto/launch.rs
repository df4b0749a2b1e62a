//! # Launch Data Transfer Objects
//!
//! Structures for the internal (operator-facing) launch and query endpoints.
//! These endpoints are guarded by bearer JWTs and use snake_case JSON.

use serde::{Deserialize, Serialize};

/// Request to launch a game session for a player.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchGameRequest {
    pub play_id: String,
    pub username: String,
    pub currency: String,
    pub game_code: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Issued game session: the URL the player's browser opens plus the session
/// token embedded in it.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchGameResponse {
    pub game_url: String,
    pub token: String,
}

/// One row of a player's transaction history (internal order query).
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub trx_id: String,
    pub play_id: String,
    pub game_code: Option<String>,
    pub bet_amount: String,
    pub win_amount: Option<String>,
    pub status: String,
    pub bet_time: String,
    pub settle_time: Option<String>,
}
