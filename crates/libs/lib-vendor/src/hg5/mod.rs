//! # Hg5 Vendor API
//!
//! Outbound calls to the Hg5 vendor platform: launch links, order state and
//! order detail pages. Opaque to the orchestrators beyond this interface.

mod client;

pub use client::Hg5HttpClient;

use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::Result;
use serde::{Deserialize, Serialize};

/// Order state as reported by the vendor's order query API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hg5Order {
    pub game_round: String,
    pub game_code: String,
    pub bet_amount: String,
    #[serde(default)]
    pub win_amount: Option<String>,
    pub status: String,
}

/// Hg5 vendor API operations consumed by the services.
#[async_trait]
pub trait Hg5Api: Send + Sync {
    /// Build the game-session URL a player's browser opens.
    async fn get_game_link(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        token: &str,
        game_code: &str,
        lang: Option<&str>,
    ) -> Result<String>;

    /// Query the vendor-side state of an order.
    async fn get_order_query(
        &self,
        creds: &ProviderCredentials,
        trx_id: &str,
    ) -> Result<Hg5Order>;

    /// Build the replay/detail page URL for an order.
    async fn get_order_detail_link(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        trx_id: &str,
        lang: Option<&str>,
    ) -> Result<String>;
}
