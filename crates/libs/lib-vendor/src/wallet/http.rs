//! HTTP implementation of the wallet client.

use super::{WalletApi, WalletResult};
use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::{AppError, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wire request for wallet mutations. Amounts travel as decimal strings.
#[derive(Debug, Serialize)]
struct WalletCallBody<'a> {
    agent_id: &'a str,
    currency: &'a str,
    play_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payout_transaction_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payout_amount: Option<Decimal>,
}

impl<'a> WalletCallBody<'a> {
    fn new(creds: &'a ProviderCredentials, play_id: &'a str) -> Self {
        Self {
            agent_id: &creds.agent_id,
            currency: &creds.currency,
            play_id,
            transaction_id: None,
            amount: None,
            payout_transaction_id: None,
            payout_amount: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WalletCallResponse {
    status_code: u32,
    #[serde(default)]
    credit_before: Option<Decimal>,
    #[serde(default)]
    credit_after: Option<Decimal>,
}

impl From<WalletCallResponse> for WalletResult {
    fn from(resp: WalletCallResponse) -> Self {
        WalletResult {
            status_code: resp.status_code,
            credit_before: resp.credit_before,
            credit_after: resp.credit_after,
        }
    }
}

/// HTTP client for the internal wallet service.
pub struct WalletHttpClient {
    http: Client,
    base_url: String,
}

impl WalletHttpClient {
    /// Create a new wallet client with timeout configuration.
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn call(&self, endpoint: &str, body: &WalletCallBody<'_>) -> Result<WalletResult> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        debug!("Wallet call: {} play_id={}", endpoint, body.play_id);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::WalletUnavailable(format!("{} request failed: {}", endpoint, e)))?;

        let parsed: WalletCallResponse = response
            .json()
            .await
            .map_err(|e| AppError::WalletUnavailable(format!("{} parse failed: {}", endpoint, e)))?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl WalletApi for WalletHttpClient {
    async fn balance(&self, creds: &ProviderCredentials, play_id: &str) -> Result<WalletResult> {
        let body = WalletCallBody::new(creds, play_id);
        self.call("balance", &body).await
    }

    async fn wager(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult> {
        let mut body = WalletCallBody::new(creds, play_id);
        body.transaction_id = Some(transaction_id);
        body.amount = Some(amount);
        self.call("wager", &body).await
    }

    async fn payout(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult> {
        let mut body = WalletCallBody::new(creds, play_id);
        body.transaction_id = Some(transaction_id);
        body.amount = Some(amount);
        self.call("payout", &body).await
    }

    async fn wager_and_payout(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        wager_transaction_id: &str,
        wager_amount: Decimal,
        payout_transaction_id: &str,
        payout_amount: Decimal,
    ) -> Result<WalletResult> {
        let mut body = WalletCallBody::new(creds, play_id);
        body.transaction_id = Some(wager_transaction_id);
        body.amount = Some(wager_amount);
        body.payout_transaction_id = Some(payout_transaction_id);
        body.payout_amount = Some(payout_amount);
        self.call("wager-and-payout", &body).await
    }

    async fn cancel(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
    ) -> Result<WalletResult> {
        let mut body = WalletCallBody::new(creds, play_id);
        body.transaction_id = Some(transaction_id);
        self.call("cancel", &body).await
    }

    async fn bonus(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult> {
        let mut body = WalletCallBody::new(creds, play_id);
        body.transaction_id = Some(transaction_id);
        body.amount = Some(amount);
        self.call("bonus", &body).await
    }
}
