//! HTTP client for the Ors vendor API.

use super::{OrsApi, OrsBettingRecord, OrsEnterGame, OrsGameInfo};
use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct OrsEnterGameResponse {
    game_url: String,
    #[serde(default)]
    vendor_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrsRecordsResponse {
    records: Vec<OrsBettingRecord>,
}

#[derive(Debug, Deserialize)]
struct OrsGameListResponse {
    games: Vec<OrsGameInfo>,
}

/// HTTP client wrapper for the Ors vendor API.
pub struct OrsHttpClient {
    http: Client,
}

impl OrsHttpClient {
    /// Create a new HTTP client with timeout configuration.
    pub fn new() -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { http })
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        creds: &ProviderCredentials,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/{}", creds.api_url.trim_end_matches('/'), endpoint);
        debug!("Ors call: {}", endpoint);

        self.http
            .post(&url)
            .bearer_auth(&creds.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Vendor(format!("Ors {} request failed: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| AppError::Vendor(format!("Ors {} parse failed: {}", endpoint, e)))
    }
}

#[async_trait]
impl OrsApi for OrsHttpClient {
    async fn enter_game(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        token: &str,
        game_code: &str,
    ) -> Result<OrsEnterGame> {
        let body = json!({
            "agent_id": creds.agent_id,
            "player_id": play_id,
            "token": token,
            "game_code": game_code,
            "currency": creds.currency,
        });

        let resp: OrsEnterGameResponse = self.post_json(creds, "enter-game", body).await?;
        Ok(OrsEnterGame {
            game_url: resp.game_url,
            vendor_token: resp.vendor_token,
        })
    }

    async fn get_betting_records(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        from_epoch_ms: i64,
        to_epoch_ms: i64,
    ) -> Result<Vec<OrsBettingRecord>> {
        let body = json!({
            "agent_id": creds.agent_id,
            "player_id": play_id,
            "from": from_epoch_ms,
            "to": to_epoch_ms,
        });

        let resp: OrsRecordsResponse = self.post_json(creds, "betting-records", body).await?;
        Ok(resp.records)
    }

    async fn get_game_list(&self, creds: &ProviderCredentials) -> Result<Vec<OrsGameInfo>> {
        let body = json!({
            "agent_id": creds.agent_id,
            "currency": creds.currency,
        });

        let resp: OrsGameListResponse = self.post_json(creds, "game-list", body).await?;
        Ok(resp.games)
    }
}
