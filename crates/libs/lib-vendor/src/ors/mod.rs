//! # Ors Vendor API
//!
//! Outbound calls to the Ors vendor platform: game entry, betting-record
//! export and the game catalogue.

mod client;

pub use client::OrsHttpClient;

use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::Result;
use serde::{Deserialize, Serialize};

/// One historical betting record exported by the vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrsBettingRecord {
    pub transaction_id: String,
    pub round_id: String,
    pub game_code: String,
    pub bet_amount: String,
    pub win_amount: String,
    pub settled_at: i64,
}

/// One entry of the vendor's game catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrsGameInfo {
    pub game_code: String,
    pub name: String,
    pub category: String,
}

/// Result of registering a session with the vendor.
#[derive(Debug, Clone)]
pub struct OrsEnterGame {
    pub game_url: String,
    /// Vendor-side token for the player, when the vendor issues one.
    pub vendor_token: Option<String>,
}

/// Ors vendor API operations consumed by the services.
#[async_trait]
pub trait OrsApi: Send + Sync {
    /// Register the session with the vendor and get the entry URL.
    async fn enter_game(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        token: &str,
        game_code: &str,
    ) -> Result<OrsEnterGame>;

    /// Export a player's settled betting records in a time window
    /// (epoch milliseconds, half-open).
    async fn get_betting_records(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        from_epoch_ms: i64,
        to_epoch_ms: i64,
    ) -> Result<Vec<OrsBettingRecord>>;

    /// Fetch the vendor's game catalogue.
    async fn get_game_list(&self, creds: &ProviderCredentials) -> Result<Vec<OrsGameInfo>>;
}
