//! # Provider Credentials
//!
//! Per-currency vendor credentials: API endpoint, agent id, shared secret and
//! public key. Configuration data, loaded once at startup and never persisted
//! by the gateway.

use lib_core::{AppError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Credentials for one currency on one vendor environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCredentials {
    pub currency: String,
    pub agent_id: String,
    pub api_url: String,
    /// Shared secret; also the signing secret for signature-authenticated
    /// callbacks.
    pub auth_token: String,
    pub public_key: String,
    /// Game codes that settle a round in a single combined call.
    #[serde(default)]
    pub arcade_game_list: Vec<String>,
}

impl ProviderCredentials {
    /// Whether a game settles through the combined wager-and-payout call.
    pub fn is_arcade_game(&self, game_code: &str) -> bool {
        self.arcade_game_list.iter().any(|g| g == game_code)
    }
}

/// Resolves provider credentials by currency. Side-effect free.
#[derive(Debug, Clone)]
pub struct CredentialsResolver {
    by_currency: HashMap<String, ProviderCredentials>,
}

impl CredentialsResolver {
    /// Build a resolver from a JSON array of credentials.
    pub fn from_json(json: &str) -> Result<Self> {
        let list: Vec<ProviderCredentials> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid provider credentials: {}", e)))?;

        let by_currency = list
            .into_iter()
            .map(|c| (c.currency.clone(), c))
            .collect();

        Ok(Self { by_currency })
    }

    /// Build a resolver from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "Failed to read provider credentials {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Resolve the credentials for a currency.
    pub fn get_by_currency(&self, currency: &str) -> Result<&ProviderCredentials> {
        self.by_currency
            .get(currency)
            .ok_or_else(|| AppError::CurrencyNotSupported(currency.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDS_JSON: &str = r#"[
        {
            "currency": "IDR",
            "agent_id": "AG1",
            "api_url": "https://vendor.example/api",
            "auth_token": "shared-secret",
            "public_key": "vendor-key-1",
            "arcade_game_list": ["arcade-1", "arcade-2"]
        },
        {
            "currency": "THB",
            "agent_id": "AG2",
            "api_url": "https://vendor.example/api",
            "auth_token": "shared-secret-2",
            "public_key": "vendor-key-2"
        }
    ]"#;

    #[test]
    fn test_resolve_by_currency() {
        let resolver = CredentialsResolver::from_json(CREDS_JSON).unwrap();

        let creds = resolver.get_by_currency("IDR").unwrap();
        assert_eq!(creds.agent_id, "AG1");
        assert!(creds.is_arcade_game("arcade-1"));
        assert!(!creds.is_arcade_game("slot-7"));
    }

    #[test]
    fn test_missing_arcade_list_defaults_empty() {
        let resolver = CredentialsResolver::from_json(CREDS_JSON).unwrap();

        let creds = resolver.get_by_currency("THB").unwrap();
        assert!(creds.arcade_game_list.is_empty());
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let resolver = CredentialsResolver::from_json(CREDS_JSON).unwrap();

        assert!(matches!(
            resolver.get_by_currency("EUR"),
            Err(AppError::CurrencyNotSupported(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        assert!(matches!(
            CredentialsResolver::from_json("not json"),
            Err(AppError::Config(_))
        ));
    }
}
