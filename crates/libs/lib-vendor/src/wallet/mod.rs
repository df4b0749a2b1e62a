//! # Wallet Client
//!
//! Client seam for the internal wallet service, the source of truth for
//! player credit. The gateway only caches transaction records; every
//! credit-affecting call goes through here.
//!
//! ## Idempotent transaction ids
//!
//! Every wallet mutation carries a transaction id deterministically derived
//! from the vendor trx id (see [`trx_id`]), so a vendor retrying a whole
//! request produces the same wallet transaction id and is deduplicated by the
//! wallet's own idempotency handling.

mod http;

pub use http::WalletHttpClient;

use crate::credentials::ProviderCredentials;
use async_trait::async_trait;
use lib_core::Result;
use rust_decimal::Decimal;

/// The wallet's canonical success status; every other code is an upstream
/// wallet error.
pub const WALLET_STATUS_OK: u32 = 2100;

/// Transient result of a wallet call; never persisted.
#[derive(Debug, Clone)]
pub struct WalletResult {
    pub status_code: u32,
    pub credit_before: Option<Decimal>,
    /// Post-call balance; for `balance` queries this is the current balance.
    pub credit_after: Option<Decimal>,
}

impl WalletResult {
    pub fn is_ok(&self) -> bool {
        self.status_code == WALLET_STATUS_OK
    }
}

/// Deterministic wallet transaction ids derived from the vendor trx id.
pub mod trx_id {
    pub fn wager(trx_id: &str) -> String {
        format!("wager-{trx_id}")
    }

    pub fn payout(trx_id: &str) -> String {
        format!("payout-{trx_id}")
    }

    pub fn cancel(trx_id: &str) -> String {
        format!("cancel-{trx_id}")
    }

    pub fn bonus(trx_id: &str) -> String {
        format!("bonus-{trx_id}")
    }
}

/// Wallet service operations consumed by the orchestrators.
#[async_trait]
pub trait WalletApi: Send + Sync {
    async fn balance(&self, creds: &ProviderCredentials, play_id: &str) -> Result<WalletResult>;

    async fn wager(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult>;

    async fn payout(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult>;

    async fn wager_and_payout(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        wager_transaction_id: &str,
        wager_amount: Decimal,
        payout_transaction_id: &str,
        payout_amount: Decimal,
    ) -> Result<WalletResult>;

    async fn cancel(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
    ) -> Result<WalletResult>;

    async fn bonus(
        &self,
        creds: &ProviderCredentials,
        play_id: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<WalletResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trx_id_derivation() {
        assert_eq!(trx_id::wager("R1"), "wager-R1");
        assert_eq!(trx_id::payout("R1"), "payout-R1");
        assert_eq!(trx_id::cancel("R1"), "cancel-R1");
        assert_eq!(trx_id::bonus("B9"), "bonus-B9");
    }

    #[test]
    fn test_wallet_result_success_sentinel() {
        let ok = WalletResult {
            status_code: WALLET_STATUS_OK,
            credit_before: None,
            credit_after: None,
        };
        let err = WalletResult {
            status_code: 2207,
            credit_before: None,
            credit_after: None,
        };

        assert!(ok.is_ok());
        assert!(!err.is_ok());
    }
}
