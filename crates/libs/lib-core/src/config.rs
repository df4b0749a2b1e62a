//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! so a misconfigured gateway fails fast.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let wallet_url = &config.wallet_api_url;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};
use std::sync::OnceLock;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for JWT token signing and verification
    ///
    /// **Must be at least 32 characters long** for security.
    pub jwt_secret: String,

    /// JWT token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub jwt_expiration_hours: i64,

    /// Base URL of the internal wallet service
    pub wallet_api_url: String,

    /// Path to the JSON document holding per-currency provider credentials
    pub provider_credentials_path: String,

    /// Validity period of issued game-session tokens, in minutes
    pub session_ttl_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/gateway.db");

        let jwt_secret =
            get_env("JWT_SECRET").map_err(|_| "JWT_SECRET must be set in environment")?;

        let jwt_expiration_hours = get_env_parse_or("JWT_EXPIRATION_HOURS", 24)
            .map_err(|e| format!("JWT_EXPIRATION_HOURS must be a valid number: {}", e))?;

        let wallet_api_url =
            get_env("WALLET_API_URL").map_err(|_| "WALLET_API_URL must be set in environment")?;

        let provider_credentials_path = get_env("PROVIDER_CREDENTIALS_PATH")
            .map_err(|_| "PROVIDER_CREDENTIALS_PATH must be set in environment")?;

        let session_ttl_minutes = get_env_parse_or("GAME_SESSION_TTL_MINUTES", 1440)
            .map_err(|e| format!("GAME_SESSION_TTL_MINUTES must be a valid number: {}", e))?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            wallet_api_url,
            provider_credentials_path,
            session_ttl_minutes,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".to_string());
        }

        if self.jwt_expiration_hours < 1 || self.jwt_expiration_hours > 720 {
            return Err("JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        if self.wallet_api_url.trim().is_empty() {
            return Err("WALLET_API_URL cannot be empty".to_string());
        }

        if self.session_ttl_minutes < 1 {
            return Err("GAME_SESSION_TTL_MINUTES must be positive".to_string());
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are missing or invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "a-test-secret-key-that-is-long-enough!".to_string(),
            jwt_expiration_hours: 24,
            wallet_api_url: "http://localhost:4000".to_string(),
            provider_credentials_path: "config/credentials.json".to_string(),
            session_ttl_minutes: 1440,
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = base_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_session_ttl() {
        let mut config = base_config();
        config.session_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }
}
