//! # Ors Orchestrator
//!
//! Batch transaction orchestration for the Ors provider. Each transfer
//! record is a completed round (wager and payout in one wallet call); the
//! batch never aborts on a single record, it returns one outcome per input
//! record, in input order.
//!
//! ## Authentication
//!
//! Every Ors callback carries a payload signature computed with the shared
//! secret, plus the vendor's public key in the `X-Public-Key` header. Both
//! checks run before any record is touched; a failure fails the whole batch
//! with no side effects.
//!
//! ## Per-record semantics
//!
//! Each record walks the same sequence as a single-transaction provider:
//! idempotency check, balance pre-check, combined wallet call with
//! deterministic transaction ids, persist. A record's failure becomes its
//! outcome; the remaining records still run.

use lib_auth::{verify_public_key, verify_signature};
use lib_core::dto::{
    format_amount, OrsBalanceData, OrsBalanceRequest, OrsCancelRequest, OrsTransferRecord,
    OrsTransferRequest,
};
use lib_core::model::store::models::{Player, TransactionStatus};
use lib_core::model::store::{PlayerRepository, TransactionRepository};
use lib_core::{AppError, DbPool, Result};
use lib_utils::time::platform_time_from_epoch_ms;
use lib_utils::validation::{validate_stake, validate_win_amount};
use lib_vendor::credentials::{CredentialsResolver, ProviderCredentials};
use lib_vendor::ors::{OrsApi, OrsBettingRecord, OrsGameInfo};
use lib_vendor::wallet::{trx_id, WalletApi};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outcome of one record in a batch: the post-call balance on success, the
/// domain error otherwise. The controller flattens these into the vendor's
/// per-record code envelope.
#[derive(Debug)]
pub struct RecordOutcome {
    pub transaction_id: String,
    pub result: Result<Decimal>,
}

/// Orchestrator service for the Ors provider.
pub struct OrsService {
    db: DbPool,
    credentials: Arc<CredentialsResolver>,
    wallet: Arc<dyn WalletApi>,
    vendor: Arc<dyn OrsApi>,
}

impl OrsService {
    pub fn new(
        db: DbPool,
        credentials: Arc<CredentialsResolver>,
        wallet: Arc<dyn WalletApi>,
        vendor: Arc<dyn OrsApi>,
    ) -> Self {
        Self {
            db,
            credentials,
            wallet,
            vendor,
        }
    }

    /// Process a transfer batch. Request-level failures (auth, player,
    /// total mismatch) fail the whole batch before any side effect;
    /// record-level failures only fail their record.
    #[instrument(skip(self, public_key, req), fields(player_id = %req.player_id, records = req.records.len()))]
    pub async fn transfer(
        &self,
        public_key: Option<&str>,
        req: OrsTransferRequest,
    ) -> Result<Vec<RecordOutcome>> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;

        check_public_key(creds, public_key)?;
        check_signature(
            creds,
            &[&req.player_id, &format_amount(req.total_amount)],
            &req.signature,
        )?;

        // The declared total must equal the net credit change of the batch.
        let net: Decimal = req
            .records
            .iter()
            .map(|r| r.win_amount - r.bet_amount)
            .sum();
        if net != req.total_amount {
            return Err(AppError::InvalidInput(format!(
                "total_amount {} does not match records net {}",
                req.total_amount, net
            )));
        }

        let mut outcomes = Vec::with_capacity(req.records.len());
        for record in &req.records {
            let result = self.process_transfer_record(creds, &player, record).await;
            outcomes.push(RecordOutcome {
                transaction_id: record.transaction_id.clone(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Process a cancel batch: reverse previously transferred records.
    #[instrument(skip(self, public_key, req), fields(player_id = %req.player_id, records = req.records.len()))]
    pub async fn cancel(
        &self,
        public_key: Option<&str>,
        req: OrsCancelRequest,
    ) -> Result<Vec<RecordOutcome>> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;

        check_public_key(creds, public_key)?;
        check_signature(creds, &[&req.player_id], &req.signature)?;

        let mut outcomes = Vec::with_capacity(req.records.len());
        for record in &req.records {
            let result = self
                .process_cancel_record(creds, &player, &record.transaction_id)
                .await;
            outcomes.push(RecordOutcome {
                transaction_id: record.transaction_id.clone(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Balance query.
    #[instrument(skip(self, public_key, req), fields(player_id = %req.player_id))]
    pub async fn balance(
        &self,
        public_key: Option<&str>,
        req: OrsBalanceRequest,
    ) -> Result<OrsBalanceData> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;

        check_public_key(creds, public_key)?;
        check_signature(creds, &[&req.player_id], &req.signature)?;

        let result = self.wallet.balance(creds, &player.play_id).await?;
        if !result.is_ok() {
            return Err(AppError::Wallet {
                status: result.status_code,
            });
        }
        let balance = result
            .credit_after
            .ok_or_else(|| AppError::Internal("wallet response missing credit_after".to_string()))?;

        Ok(OrsBalanceData {
            player_id: player.play_id,
            currency: player.currency,
            balance: format_amount(balance),
        })
    }

    /// Export a player's settled records from the vendor (operator endpoint).
    pub async fn betting_records(
        &self,
        play_id: &str,
        from_epoch_ms: i64,
        to_epoch_ms: i64,
    ) -> Result<Vec<OrsBettingRecord>> {
        let player = self.resolve_player(play_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.vendor
            .get_betting_records(creds, &player.play_id, from_epoch_ms, to_epoch_ms)
            .await
    }

    /// Fetch the vendor game catalogue for a currency (operator endpoint).
    pub async fn game_list(&self, currency: &str) -> Result<Vec<OrsGameInfo>> {
        let creds = self.credentials.get_by_currency(currency)?;
        self.vendor.get_game_list(creds).await
    }

    async fn process_transfer_record(
        &self,
        creds: &ProviderCredentials,
        player: &Player,
        record: &OrsTransferRecord,
    ) -> Result<Decimal> {
        validate_stake(record.bet_amount, "bet_amount").map_err(AppError::InvalidInput)?;
        validate_win_amount(record.win_amount, "win_amount").map_err(AppError::InvalidInput)?;
        let event_time = platform_time_from_epoch_ms(record.event_time)?;

        if TransactionRepository::find_by_trx_id(&self.db, &record.transaction_id)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::TransactionAlreadyExists(
                record.transaction_id.clone(),
            ));
        }

        // Auxiliary main-round linkage is optional: a record may reference a
        // main game round this gateway never stored.
        if let Some(main_round_id) = &record.main_round_id {
            if TransactionRepository::find_by_trx_id(&self.db, main_round_id)
                .await
                .map_err(AppError::from)?
                .is_none()
            {
                debug!(
                    "Transfer {} references unknown main round {}",
                    record.transaction_id, main_round_id
                );
            }
        }

        let balance = self.wallet.balance(creds, &player.play_id).await?;
        if !balance.is_ok() {
            return Err(AppError::Wallet {
                status: balance.status_code,
            });
        }
        let credit = balance
            .credit_after
            .ok_or_else(|| AppError::Internal("wallet response missing credit_after".to_string()))?;
        if credit < record.bet_amount {
            return Err(AppError::InsufficientFunds);
        }

        let result = self
            .wallet
            .wager_and_payout(
                creds,
                &player.play_id,
                &trx_id::wager(&record.transaction_id),
                record.bet_amount,
                &trx_id::payout(&record.transaction_id),
                record.win_amount,
            )
            .await?;
        if !result.is_ok() {
            return Err(AppError::Wallet {
                status: result.status_code,
            });
        }

        TransactionRepository::create_settled(
            &self.db,
            &record.transaction_id,
            &player.play_id,
            Some(&record.game_code),
            record.bet_amount,
            record.win_amount,
            event_time,
            event_time,
        )
        .await
        .map_err(AppError::from)?;

        debug!(
            "Transfer recorded: trx={} round={}",
            record.transaction_id, record.round_id
        );

        result
            .credit_after
            .ok_or_else(|| AppError::Internal("wallet response missing credit_after".to_string()))
    }

    async fn process_cancel_record(
        &self,
        creds: &ProviderCredentials,
        player: &Player,
        transaction_id: &str,
    ) -> Result<Decimal> {
        let trx = TransactionRepository::find_by_trx_id(&self.db, transaction_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::TransactionNotFound(transaction_id.to_string()))?;

        if trx.play_id != player.play_id {
            return Err(AppError::TransactionNotFound(transaction_id.to_string()));
        }
        if trx.status == TransactionStatus::Cancelled {
            return Err(AppError::TransactionAlreadySettled(
                transaction_id.to_string(),
            ));
        }

        let result = self
            .wallet
            .cancel(creds, &player.play_id, &trx_id::cancel(transaction_id))
            .await?;
        if !result.is_ok() {
            return Err(AppError::Wallet {
                status: result.status_code,
            });
        }

        let affected = TransactionRepository::cancel(&self.db, transaction_id)
            .await
            .map_err(AppError::from)?;
        if affected == 0 {
            return Err(AppError::TransactionAlreadySettled(
                transaction_id.to_string(),
            ));
        }

        result
            .credit_after
            .ok_or_else(|| AppError::Internal("wallet response missing credit_after".to_string()))
    }

    async fn resolve_player(&self, play_id: &str) -> Result<Player> {
        PlayerRepository::find_by_play_id(&self.db, play_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::PlayerNotFound(play_id.to_string()))
    }
}

fn check_public_key(creds: &ProviderCredentials, presented: Option<&str>) -> Result<()> {
    let presented = presented.ok_or(AppError::InvalidPublicKey)?;
    if !verify_public_key(presented, &creds.public_key) {
        return Err(AppError::InvalidPublicKey);
    }
    Ok(())
}

fn check_signature(creds: &ProviderCredentials, parts: &[&str], presented: &str) -> Result<()> {
    if !verify_signature(parts, &creds.auth_token, presented) {
        return Err(AppError::InvalidSignature);
    }
    Ok(())
}
