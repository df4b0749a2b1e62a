//! # Services Layer
//!
//! Orchestrator services sitting between the HTTP handlers and the
//! repositories / external collaborators (wallet service, vendor APIs).
//!
//! ## Architecture
//!
//! ```text
//! Handlers (HTTP) → Services (orchestration) → Repositories / Wallet / Vendor APIs
//! ```
//!
//! Every transactional method walks the same fixed sequence: resolve player →
//! resolve credentials → authenticate → cross-checks → idempotency check →
//! wallet call with a deterministic transaction id → persist the local record
//! → return the post-call balance. A failure at any step short-circuits; the
//! vendor retries the whole request and the deterministic wallet transaction
//! ids make that safe.
//!
//! ## Module Organization
//!
//! - [`launch`] - Launch flow and operator queries
//! - [`hg5`] - Hg5 single-transaction orchestrator
//! - [`ors`] - Ors batch orchestrator
//!
//! ## Error Handling
//!
//! All services return `Result<T, AppError>`. Handlers translate errors into
//! the vendor's coded envelope (or, for internal endpoints, rely on
//! `AppError`'s `IntoResponse`).

pub mod hg5;
pub mod launch;
pub mod ors;

// Re-export services for convenience
pub use hg5::Hg5Service;
pub use launch::LaunchService;
pub use ors::OrsService;

// region: --- Test Support
#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use lib_core::{AppError, DbPool, Result};
    use lib_vendor::credentials::{CredentialsResolver, ProviderCredentials};
    use lib_vendor::hg5::{Hg5Api, Hg5Order};
    use lib_vendor::ors::{OrsApi, OrsBettingRecord, OrsEnterGame, OrsGameInfo};
    use lib_vendor::wallet::{WalletApi, WalletResult, WALLET_STATUS_OK};
    use rust_decimal::Decimal;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Mutex;

    /// Create an in-memory SQLite database with the gateway schema.
    pub async fn setup_test_db() -> DbPool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                play_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                currency TEXT NOT NULL,
                external_token TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create players table");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                play_id TEXT NOT NULL,
                token TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                expires_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create game_sessions table");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bet_transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trx_id TEXT NOT NULL UNIQUE,
                play_id TEXT NOT NULL,
                game_code TEXT,
                bet_amount INTEGER NOT NULL,
                win_amount INTEGER,
                bet_time TIMESTAMP NOT NULL,
                settle_time TIMESTAMP,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create bet_transactions table");

        pool
    }

    /// Resolver with one IDR credential matching [`test_creds`].
    pub fn test_resolver() -> CredentialsResolver {
        CredentialsResolver::from_json(
            r#"[{
                "currency": "IDR",
                "agent_id": "AG1",
                "api_url": "https://vendor.example/api",
                "auth_token": "shared-secret",
                "public_key": "vendor-key-1",
                "arcade_game_list": ["arcade-1"]
            }]"#,
        )
        .expect("test credentials must parse")
    }

    /// In-memory wallet double: tracks a single balance, records every call,
    /// and can be forced to answer with a non-success status.
    pub struct MockWallet {
        pub balance: Mutex<Decimal>,
        pub fail_status: Mutex<Option<u32>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockWallet {
        pub fn with_balance(balance: Decimal) -> Self {
            Self {
                balance: Mutex::new(balance),
                fail_status: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Calls of one kind, e.g. every `wager:` entry.
        pub fn calls_of(&self, kind: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with(kind))
                .collect()
        }

        fn answer(&self, record: String, delta: Decimal) -> Result<WalletResult> {
            self.calls.lock().unwrap().push(record);

            if let Some(status) = *self.fail_status.lock().unwrap() {
                return Ok(WalletResult {
                    status_code: status,
                    credit_before: None,
                    credit_after: None,
                });
            }

            let mut balance = self.balance.lock().unwrap();
            let before = *balance;
            *balance += delta;

            Ok(WalletResult {
                status_code: WALLET_STATUS_OK,
                credit_before: Some(before),
                credit_after: Some(*balance),
            })
        }
    }

    #[async_trait]
    impl WalletApi for MockWallet {
        async fn balance(
            &self,
            _creds: &ProviderCredentials,
            play_id: &str,
        ) -> Result<WalletResult> {
            self.answer(format!("balance:{play_id}"), Decimal::ZERO)
        }

        async fn wager(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            transaction_id: &str,
            amount: Decimal,
        ) -> Result<WalletResult> {
            self.answer(format!("wager:{transaction_id}:{amount}"), -amount)
        }

        async fn payout(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            transaction_id: &str,
            amount: Decimal,
        ) -> Result<WalletResult> {
            self.answer(format!("payout:{transaction_id}:{amount}"), amount)
        }

        async fn wager_and_payout(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            wager_transaction_id: &str,
            wager_amount: Decimal,
            payout_transaction_id: &str,
            payout_amount: Decimal,
        ) -> Result<WalletResult> {
            self.answer(
                format!(
                    "wager_and_payout:{wager_transaction_id}:{wager_amount}:{payout_transaction_id}:{payout_amount}"
                ),
                payout_amount - wager_amount,
            )
        }

        async fn cancel(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            transaction_id: &str,
        ) -> Result<WalletResult> {
            self.answer(format!("cancel:{transaction_id}"), Decimal::ZERO)
        }

        async fn bonus(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            transaction_id: &str,
            amount: Decimal,
        ) -> Result<WalletResult> {
            self.answer(format!("bonus:{transaction_id}:{amount}"), amount)
        }
    }

    /// Hg5 vendor API double returning canned links.
    pub struct MockHg5;

    #[async_trait]
    impl Hg5Api for MockHg5 {
        async fn get_game_link(
            &self,
            _creds: &ProviderCredentials,
            play_id: &str,
            token: &str,
            game_code: &str,
            _lang: Option<&str>,
        ) -> Result<String> {
            Ok(format!(
                "https://games.example/hg5/{game_code}?player={play_id}&token={token}"
            ))
        }

        async fn get_order_query(
            &self,
            _creds: &ProviderCredentials,
            trx_id: &str,
        ) -> Result<Hg5Order> {
            Ok(Hg5Order {
                game_round: trx_id.to_string(),
                game_code: "slot-7".to_string(),
                bet_amount: "10.00".to_string(),
                win_amount: None,
                status: "pending".to_string(),
            })
        }

        async fn get_order_detail_link(
            &self,
            _creds: &ProviderCredentials,
            play_id: &str,
            trx_id: &str,
            _lang: Option<&str>,
        ) -> Result<String> {
            Ok(format!(
                "https://games.example/hg5/orders/{trx_id}?player={play_id}"
            ))
        }
    }

    /// Ors vendor API double.
    pub struct MockOrs;

    #[async_trait]
    impl OrsApi for MockOrs {
        async fn enter_game(
            &self,
            _creds: &ProviderCredentials,
            play_id: &str,
            token: &str,
            game_code: &str,
        ) -> Result<OrsEnterGame> {
            Ok(OrsEnterGame {
                game_url: format!(
                    "https://games.example/ors/{game_code}?player={play_id}&token={token}"
                ),
                vendor_token: Some(format!("ors-{play_id}")),
            })
        }

        async fn get_betting_records(
            &self,
            _creds: &ProviderCredentials,
            _play_id: &str,
            _from_epoch_ms: i64,
            _to_epoch_ms: i64,
        ) -> Result<Vec<OrsBettingRecord>> {
            Ok(Vec::new())
        }

        async fn get_game_list(&self, _creds: &ProviderCredentials) -> Result<Vec<OrsGameInfo>> {
            Ok(vec![OrsGameInfo {
                game_code: "fish-2".to_string(),
                name: "Fish Hunter II".to_string(),
                category: "arcade".to_string(),
            }])
        }
    }

    /// A wallet double that always reports unreachable, for outage paths.
    pub struct DownWallet;

    #[async_trait]
    impl WalletApi for DownWallet {
        async fn balance(&self, _c: &ProviderCredentials, _p: &str) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }

        async fn wager(
            &self,
            _c: &ProviderCredentials,
            _p: &str,
            _t: &str,
            _a: Decimal,
        ) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }

        async fn payout(
            &self,
            _c: &ProviderCredentials,
            _p: &str,
            _t: &str,
            _a: Decimal,
        ) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }

        async fn wager_and_payout(
            &self,
            _c: &ProviderCredentials,
            _p: &str,
            _wt: &str,
            _wa: Decimal,
            _pt: &str,
            _pa: Decimal,
        ) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }

        async fn cancel(
            &self,
            _c: &ProviderCredentials,
            _p: &str,
            _t: &str,
        ) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }

        async fn bonus(
            &self,
            _c: &ProviderCredentials,
            _p: &str,
            _t: &str,
            _a: Decimal,
        ) -> Result<WalletResult> {
            Err(AppError::WalletUnavailable("connection refused".into()))
        }
    }
}
// endregion: --- Test Support
