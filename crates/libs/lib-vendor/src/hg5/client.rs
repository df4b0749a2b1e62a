//! HTTP client for the Hg5 vendor API.

use super::{Hg5Api, Hg5Order};
use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Hg5LinkResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct Hg5OrderResponse {
    order: Hg5Order,
}

/// HTTP client wrapper for the Hg5 vendor API.
pub struct Hg5HttpClient {
    http: Client,
}

impl Hg5HttpClient {
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
        debug!("Hg5 call: {}", endpoint);

        self.http
            .post(&url)
            .bearer_auth(&creds.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Vendor(format!("Hg5 {} request failed: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| AppError::Vendor(format!("Hg5 {} parse failed: {}", endpoint, e)))
    }
}

#[async_trait]
impl Hg5Api for Hg5HttpClient {
    async fn get_game_link(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        token: &str,
        game_code: &str,
        lang: Option<&str>,
    ) -> Result<String> {
        let body = json!({
            "agentId": creds.agent_id,
            "playerId": play_id,
            "token": token,
            "gameCode": game_code,
            "currency": creds.currency,
            "lang": lang.unwrap_or("en"),
        });

        let resp: Hg5LinkResponse = self.post_json(creds, "game-link", body).await?;
        Ok(resp.url)
    }

    async fn get_order_query(
        &self,
        creds: &ProviderCredentials,
        trx_id: &str,
    ) -> Result<Hg5Order> {
        let body = json!({
            "agentId": creds.agent_id,
            "gameRound": trx_id,
        });

        let resp: Hg5OrderResponse = self.post_json(creds, "order-query", body).await?;
        Ok(resp.order)
    }

    async fn get_order_detail_link(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        trx_id: &str,
        lang: Option<&str>,
    ) -> Result<String> {
        let body = json!({
            "agentId": creds.agent_id,
            "playerId": play_id,
            "gameRound": trx_id,
            "lang": lang.unwrap_or("en"),
        });

        let resp: Hg5LinkResponse = self.post_json(creds, "order-detail-link", body).await?;
        Ok(resp.url)
    }
}
