//! # Hg5 Orchestrator
//!
//! Transaction orchestration for the Hg5 provider, one endpoint per
//! transaction kind: authenticate, balance, bet, settle, combined
//! bet-and-settle (arcade games), cancel, bonus, plus operator-side order
//! queries against the vendor API.
//!
//! ## Authentication
//!
//! Hg5 authenticates gameplay calls with the game-session token it received
//! in the launch URL; token expiry is enforced on authenticate/balance/bet.
//! Settle, cancel and bonus arrive server-to-server, possibly long after the
//! session ended, and are authenticated by the agent-id cross-check alone.
//!
//! ## Idempotency
//!
//! The vendor round id (`gameRound`, or `bonusId` for bonuses) is the
//! idempotency key. A duplicate bet is rejected before any wallet call; a
//! second settle or cancel of the same round is rejected once the record has
//! its terminal write. The wallet-side transaction ids are derived from the
//! round id so vendor retries collapse downstream as well.
//!
//! The local record is written only after the wallet call succeeds: the
//! wallet is the source of truth, the record is a cache and audit trail.

use lib_core::dto::{format_amount, Hg5BalanceData};
use lib_core::dto::{
    Hg5AuthRequest, Hg5BalanceRequest, Hg5BetRequest, Hg5BetSettleRequest, Hg5BonusRequest,
    Hg5CancelRequest, Hg5SettleRequest,
};
use lib_core::model::store::models::{BetTransaction, Player};
use lib_core::model::store::{PlayerRepository, SessionRepository, TransactionRepository};
use lib_core::{AppError, DbPool, Result};
use lib_utils::now_utc;
use lib_utils::time::platform_time_from_epoch_ms;
use lib_utils::validation::{validate_stake, validate_win_amount};
use lib_vendor::credentials::{CredentialsResolver, ProviderCredentials};
use lib_vendor::hg5::{Hg5Api, Hg5Order};
use lib_vendor::wallet::{trx_id, WalletApi, WalletResult};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Orchestrator service for the Hg5 provider.
pub struct Hg5Service {
    db: DbPool,
    credentials: Arc<CredentialsResolver>,
    wallet: Arc<dyn WalletApi>,
    vendor: Arc<dyn Hg5Api>,
}

impl Hg5Service {
    pub fn new(
        db: DbPool,
        credentials: Arc<CredentialsResolver>,
        wallet: Arc<dyn WalletApi>,
        vendor: Arc<dyn Hg5Api>,
    ) -> Self {
        Self {
            db,
            credentials,
            wallet,
            vendor,
        }
    }

    /// Authenticate a game-session token and return the player's balance.
    #[instrument(skip(self, req), fields(player_id = %req.player_id))]
    pub async fn authenticate(&self, req: Hg5AuthRequest) -> Result<Hg5BalanceData> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.check_session(&player.play_id, &req.token, true).await?;

        let result = require_wallet_ok(self.wallet.balance(creds, &player.play_id).await?)?;
        balance_data(&player, &result)
    }

    /// Balance query for an authenticated session.
    #[instrument(skip(self, req), fields(player_id = %req.player_id))]
    pub async fn balance(&self, req: Hg5BalanceRequest) -> Result<Hg5BalanceData> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.check_session(&player.play_id, &req.token, true).await?;

        let result = require_wallet_ok(self.wallet.balance(creds, &player.play_id).await?)?;
        balance_data(&player, &result)
    }

    /// Place a bet: wager against the wallet, then record a pending
    /// transaction keyed by the round id.
    #[instrument(skip(self, req), fields(player_id = %req.player_id, game_round = %req.game_round))]
    pub async fn bet(&self, req: Hg5BetRequest) -> Result<Hg5BalanceData> {
        validate_stake(req.amount, "amount").map_err(AppError::InvalidInput)?;
        let bet_time = platform_time_from_epoch_ms(req.event_time)?;

        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.check_session(&player.play_id, &req.token, true).await?;
        check_agent(creds, &req.agent_id)?;

        if TransactionRepository::find_by_trx_id(&self.db, &req.game_round)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::TransactionAlreadyExists(req.game_round));
        }

        // Balance pre-check: no wager is attempted when credit is short.
        let balance = require_wallet_ok(self.wallet.balance(creds, &player.play_id).await?)?;
        if credit_after(&balance)? < req.amount {
            return Err(AppError::InsufficientFunds);
        }

        let result = require_wallet_ok(
            self.wallet
                .wager(creds, &player.play_id, &trx_id::wager(&req.game_round), req.amount)
                .await?,
        )?;

        TransactionRepository::create_bet(
            &self.db,
            &req.game_round,
            &player.play_id,
            Some(&req.game_code),
            req.amount,
            bet_time,
        )
        .await
        .map_err(AppError::from)?;

        debug!("Bet recorded: round={} amount={}", req.game_round, req.amount);
        balance_data(&player, &result)
    }

    /// Settle a previously placed bet: payout against the wallet, then mark
    /// the record settled. Exactly-once: a second settle is rejected.
    #[instrument(skip(self, req), fields(player_id = %req.player_id, game_round = %req.game_round))]
    pub async fn settle(&self, req: Hg5SettleRequest) -> Result<Hg5BalanceData> {
        validate_win_amount(req.win_amount, "winAmount").map_err(AppError::InvalidInput)?;
        let settle_time = platform_time_from_epoch_ms(req.event_time)?;

        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        check_agent(creds, &req.agent_id)?;

        let trx = self.find_player_trx(&player, &req.game_round).await?;
        if trx.is_terminal() {
            return Err(AppError::TransactionAlreadySettled(req.game_round));
        }

        let result = require_wallet_ok(
            self.wallet
                .payout(
                    creds,
                    &player.play_id,
                    &trx_id::payout(&req.game_round),
                    req.win_amount,
                )
                .await?,
        )?;

        let affected =
            TransactionRepository::settle(&self.db, &req.game_round, req.win_amount, settle_time)
                .await
                .map_err(AppError::from)?;
        if affected == 0 {
            // Lost the race against another settle/cancel of the same round;
            // the wallet deduplicated the payout by its transaction id.
            return Err(AppError::TransactionAlreadySettled(req.game_round));
        }

        balance_data(&player, &result)
    }

    /// Combined wager-and-payout for arcade games that settle a round in a
    /// single call.
    #[instrument(skip(self, req), fields(player_id = %req.player_id, game_round = %req.game_round))]
    pub async fn bet_settle(&self, req: Hg5BetSettleRequest) -> Result<Hg5BalanceData> {
        validate_stake(req.bet_amount, "betAmount").map_err(AppError::InvalidInput)?;
        validate_win_amount(req.win_amount, "winAmount").map_err(AppError::InvalidInput)?;
        let event_time = platform_time_from_epoch_ms(req.event_time)?;

        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.check_session(&player.play_id, &req.token, true).await?;
        check_agent(creds, &req.agent_id)?;

        if !creds.is_arcade_game(&req.game_code) {
            return Err(AppError::InvalidInput(format!(
                "gameCode {} does not settle in a single call",
                req.game_code
            )));
        }

        if TransactionRepository::find_by_trx_id(&self.db, &req.game_round)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::TransactionAlreadyExists(req.game_round));
        }

        let balance = require_wallet_ok(self.wallet.balance(creds, &player.play_id).await?)?;
        if credit_after(&balance)? < req.bet_amount {
            return Err(AppError::InsufficientFunds);
        }

        let result = require_wallet_ok(
            self.wallet
                .wager_and_payout(
                    creds,
                    &player.play_id,
                    &trx_id::wager(&req.game_round),
                    req.bet_amount,
                    &trx_id::payout(&req.game_round),
                    req.win_amount,
                )
                .await?,
        )?;

        TransactionRepository::create_settled(
            &self.db,
            &req.game_round,
            &player.play_id,
            Some(&req.game_code),
            req.bet_amount,
            req.win_amount,
            event_time,
            event_time,
        )
        .await
        .map_err(AppError::from)?;

        balance_data(&player, &result)
    }

    /// Roll back a bet whose round never completed.
    #[instrument(skip(self, req), fields(player_id = %req.player_id, game_round = %req.game_round))]
    pub async fn cancel(&self, req: Hg5CancelRequest) -> Result<Hg5BalanceData> {
        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        check_agent(creds, &req.agent_id)?;

        let trx = self.find_player_trx(&player, &req.game_round).await?;
        if trx.is_terminal() {
            return Err(AppError::TransactionAlreadySettled(req.game_round));
        }

        let result = require_wallet_ok(
            self.wallet
                .cancel(creds, &player.play_id, &trx_id::cancel(&req.game_round))
                .await?,
        )?;

        let affected = TransactionRepository::cancel_pending(&self.db, &req.game_round)
            .await
            .map_err(AppError::from)?;
        if affected == 0 {
            return Err(AppError::TransactionAlreadySettled(req.game_round));
        }

        balance_data(&player, &result)
    }

    /// Credit a promotional bonus, recorded as a settled zero-stake round.
    #[instrument(skip(self, req), fields(player_id = %req.player_id, bonus_id = %req.bonus_id))]
    pub async fn bonus(&self, req: Hg5BonusRequest) -> Result<Hg5BalanceData> {
        validate_stake(req.amount, "amount").map_err(AppError::InvalidInput)?;
        let event_time = platform_time_from_epoch_ms(req.event_time)?;

        let player = self.resolve_player(&req.player_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        check_agent(creds, &req.agent_id)?;

        if TransactionRepository::find_by_trx_id(&self.db, &req.bonus_id)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::TransactionAlreadyExists(req.bonus_id));
        }

        let result = require_wallet_ok(
            self.wallet
                .bonus(creds, &player.play_id, &trx_id::bonus(&req.bonus_id), req.amount)
                .await?,
        )?;

        TransactionRepository::create_settled(
            &self.db,
            &req.bonus_id,
            &player.play_id,
            None,
            Decimal::ZERO,
            req.amount,
            event_time,
            event_time,
        )
        .await
        .map_err(AppError::from)?;

        balance_data(&player, &result)
    }

    /// Query the vendor-side state of an order (operator endpoint).
    pub async fn order_query(&self, play_id: &str, trx_id: &str) -> Result<Hg5Order> {
        let player = self.resolve_player(play_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.vendor.get_order_query(creds, trx_id).await
    }

    /// Build the replay/detail page URL for an order (operator endpoint).
    pub async fn order_detail_link(
        &self,
        play_id: &str,
        trx_id: &str,
        lang: Option<&str>,
    ) -> Result<String> {
        let player = self.resolve_player(play_id).await?;
        let creds = self.credentials.get_by_currency(&player.currency)?;
        self.vendor
            .get_order_detail_link(creds, &player.play_id, trx_id, lang)
            .await
    }

    async fn resolve_player(&self, play_id: &str) -> Result<Player> {
        PlayerRepository::find_by_play_id(&self.db, play_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::PlayerNotFound(play_id.to_string()))
    }

    /// Validate the presented game-session token.
    ///
    /// `enforce_expiry` is on for gameplay calls; the launch-issued token must
    /// still be live there.
    async fn check_session(
        &self,
        play_id: &str,
        token: &str,
        enforce_expiry: bool,
    ) -> Result<()> {
        let session = SessionRepository::find_by_play_id_and_token(&self.db, play_id, token)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::InvalidToken)?;

        if enforce_expiry && session.is_expired(now_utc()) {
            return Err(AppError::InvalidToken);
        }

        Ok(())
    }

    /// Look up a round that must exist and belong to the player.
    async fn find_player_trx(&self, player: &Player, trx_id: &str) -> Result<BetTransaction> {
        let trx = TransactionRepository::find_by_trx_id(&self.db, trx_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::TransactionNotFound(trx_id.to_string()))?;

        if trx.play_id != player.play_id {
            return Err(AppError::TransactionNotFound(trx_id.to_string()));
        }

        Ok(trx)
    }
}

fn check_agent(creds: &ProviderCredentials, agent_id: &str) -> Result<()> {
    if creds.agent_id != agent_id {
        return Err(AppError::InvalidAgentId);
    }
    Ok(())
}

fn require_wallet_ok(result: WalletResult) -> Result<WalletResult> {
    if !result.is_ok() {
        return Err(AppError::Wallet {
            status: result.status_code,
        });
    }
    Ok(result)
}

fn credit_after(result: &WalletResult) -> Result<Decimal> {
    result
        .credit_after
        .ok_or_else(|| AppError::Internal("wallet response missing credit_after".to_string()))
}

fn balance_data(player: &Player, result: &WalletResult) -> Result<Hg5BalanceData> {
    Ok(Hg5BalanceData {
        player_id: player.play_id.clone(),
        currency: player.currency.clone(),
        balance: format_amount(credit_after(result)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{setup_test_db, test_resolver, DownWallet, MockHg5, MockWallet};
    use lib_core::model::store::models::TransactionStatus;
    use rust_decimal_macros::dec;

    const EVENT_TIME: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    async fn service_with_balance(balance: Decimal) -> (Hg5Service, Arc<MockWallet>, DbPool) {
        let pool = setup_test_db().await;
        let wallet = Arc::new(MockWallet::with_balance(balance));
        let service = Hg5Service::new(
            pool.clone(),
            Arc::new(test_resolver()),
            wallet.clone(),
            Arc::new(MockHg5),
        );
        (service, wallet, pool)
    }

    async fn seed_player_with_session(pool: &DbPool) {
        PlayerRepository::upsert(pool, "P1", "alice", "IDR")
            .await
            .unwrap();
        SessionRepository::create(pool, "P1", "tok-1", 60)
            .await
            .unwrap();
    }

    fn bet_request(round: &str, amount: Decimal) -> Hg5BetRequest {
        Hg5BetRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            token: "tok-1".to_string(),
            game_code: "slot-7".to_string(),
            game_round: round.to_string(),
            amount,
            event_time: EVENT_TIME,
        }
    }

    fn settle_request(round: &str, win: Decimal) -> Hg5SettleRequest {
        Hg5SettleRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            game_round: round.to_string(),
            win_amount: win,
            event_time: EVENT_TIME,
        }
    }

    // ========== Bet ==========

    #[tokio::test]
    async fn test_bet_wagers_once_and_records_pending() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let data = service.bet(bet_request("R1", dec!(200))).await.unwrap();

        assert_eq!(data.balance, "800.00");
        assert_eq!(data.currency, "IDR");
        assert_eq!(wallet.calls_of("wager:"), vec!["wager:wager-R1:200"]);

        let trx = TransactionRepository::find_by_trx_id(&pool, "R1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trx.status, TransactionStatus::Pending);
        assert_eq!(trx.bet_amount_decimal(), dec!(200));
        // Event time normalized to the platform offset before storage.
        assert_eq!(trx.bet_time.to_string(), "2024-01-01 08:00:00");
    }

    #[tokio::test]
    async fn test_bet_replay_is_rejected_without_wallet_call() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        service.bet(bet_request("R1", dec!(200))).await.unwrap();
        let err = service.bet(bet_request("R1", dec!(200))).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionAlreadyExists(_)));
        assert_eq!(wallet.calls_of("wager:").len(), 1);
    }

    #[tokio::test]
    async fn test_bet_insufficient_funds_issues_no_wager() {
        let (service, wallet, pool) = service_with_balance(dec!(100)).await;
        seed_player_with_session(&pool).await;

        let err = service.bet(bet_request("R1", dec!(200))).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds));
        assert!(wallet.calls_of("wager:").is_empty());
        assert!(TransactionRepository::find_by_trx_id(&pool, "R1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bet_with_unknown_player() {
        let (service, wallet, _pool) = service_with_balance(dec!(1000)).await;

        let err = service.bet(bet_request("R1", dec!(10))).await.unwrap_err();

        assert!(matches!(err, AppError::PlayerNotFound(_)));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bet_with_bad_token() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let mut req = bet_request("R1", dec!(10));
        req.token = "tok-wrong".to_string();
        let err = service.bet(req).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidToken));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bet_with_expired_session() {
        let (service, _wallet, pool) = service_with_balance(dec!(1000)).await;
        PlayerRepository::upsert(&pool, "P1", "alice", "IDR")
            .await
            .unwrap();
        SessionRepository::create(&pool, "P1", "tok-1", -5)
            .await
            .unwrap();

        let err = service.bet(bet_request("R1", dec!(10))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn test_bet_with_wrong_agent() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let mut req = bet_request("R1", dec!(10));
        req.agent_id = "AG-other".to_string();
        let err = service.bet(req).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidAgentId));
        assert!(wallet.calls_of("wager:").is_empty());
    }

    #[tokio::test]
    async fn test_bet_rejects_non_positive_amount() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let err = service.bet(bet_request("R1", dec!(0))).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bet_surfaces_wallet_status_and_records_nothing() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;
        *wallet.fail_status.lock().unwrap() = Some(2207);

        let err = service.bet(bet_request("R1", dec!(200))).await.unwrap_err();

        assert!(matches!(err, AppError::Wallet { status: 2207 }));
        assert!(TransactionRepository::find_by_trx_id(&pool, "R1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bet_wallet_unreachable() {
        let pool = setup_test_db().await;
        seed_player_with_session(&pool).await;
        let service = Hg5Service::new(
            pool.clone(),
            Arc::new(test_resolver()),
            Arc::new(DownWallet),
            Arc::new(MockHg5),
        );

        let err = service.bet(bet_request("R1", dec!(10))).await.unwrap_err();
        assert!(matches!(err, AppError::WalletUnavailable(_)));
    }

    // ========== Settle ==========

    #[tokio::test]
    async fn test_settle_pays_out_exactly_once() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        service.bet(bet_request("R1", dec!(200))).await.unwrap();
        let data = service.settle(settle_request("R1", dec!(350))).await.unwrap();

        assert_eq!(data.balance, "1150.00");
        assert_eq!(wallet.calls_of("payout:"), vec!["payout:payout-R1:350"]);

        let trx = TransactionRepository::find_by_trx_id(&pool, "R1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trx.status, TransactionStatus::Settled);
        assert_eq!(trx.win_amount_decimal().unwrap(), dec!(350));

        // A second settle is rejected and issues no further payout.
        let err = service
            .settle(settle_request("R1", dec!(350)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TransactionAlreadySettled(_)));
        assert_eq!(wallet.calls_of("payout:").len(), 1);
    }

    #[tokio::test]
    async fn test_settle_unknown_round() {
        let (service, _wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let err = service
            .settle(settle_request("R404", dec!(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TransactionNotFound(_)));
    }

    #[tokio::test]
    async fn test_settle_with_zero_win_is_valid() {
        let (service, _wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        service.bet(bet_request("R1", dec!(200))).await.unwrap();
        let data = service.settle(settle_request("R1", dec!(0))).await.unwrap();

        assert_eq!(data.balance, "800.00");
    }

    #[tokio::test]
    async fn test_settle_someone_elses_round() {
        let (service, _wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;
        PlayerRepository::upsert(&pool, "P2", "bob", "IDR").await.unwrap();

        service.bet(bet_request("R1", dec!(200))).await.unwrap();

        let mut req = settle_request("R1", dec!(10));
        req.player_id = "P2".to_string();
        let err = service.settle(req).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionNotFound(_)));
    }

    // ========== Combined bet-and-settle ==========

    #[tokio::test]
    async fn test_bet_settle_uses_combined_wallet_call() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let req = Hg5BetSettleRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            token: "tok-1".to_string(),
            game_code: "arcade-1".to_string(),
            game_round: "A1".to_string(),
            bet_amount: dec!(20),
            win_amount: dec!(50),
            event_time: EVENT_TIME,
        };
        let data = service.bet_settle(req).await.unwrap();

        assert_eq!(data.balance, "1030.00");
        assert_eq!(
            wallet.calls_of("wager_and_payout:"),
            vec!["wager_and_payout:wager-A1:20:payout-A1:50"]
        );

        let trx = TransactionRepository::find_by_trx_id(&pool, "A1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trx.status, TransactionStatus::Settled);
        assert!(trx.is_terminal());
    }

    #[tokio::test]
    async fn test_bet_settle_rejects_non_arcade_game() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let req = Hg5BetSettleRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            token: "tok-1".to_string(),
            game_code: "slot-7".to_string(),
            game_round: "A1".to_string(),
            bet_amount: dec!(20),
            win_amount: dec!(50),
            event_time: EVENT_TIME,
        };
        let err = service.bet_settle(req).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(wallet.calls_of("wager_and_payout:").is_empty());
    }

    // ========== Cancel ==========

    #[tokio::test]
    async fn test_cancel_pending_bet() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        service.bet(bet_request("R1", dec!(200))).await.unwrap();

        let req = Hg5CancelRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            game_round: "R1".to_string(),
            event_time: EVENT_TIME,
        };
        service.cancel(req).await.unwrap();

        assert_eq!(wallet.calls_of("cancel:"), vec!["cancel:cancel-R1"]);
        let trx = TransactionRepository::find_by_trx_id(&pool, "R1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trx.status, TransactionStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_settled_bet_is_rejected() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        service.bet(bet_request("R1", dec!(200))).await.unwrap();
        service.settle(settle_request("R1", dec!(0))).await.unwrap();

        let req = Hg5CancelRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            game_round: "R1".to_string(),
            event_time: EVENT_TIME,
        };
        let err = service.cancel(req).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionAlreadySettled(_)));
        assert!(wallet.calls_of("cancel:").is_empty());
    }

    // ========== Bonus ==========

    #[tokio::test]
    async fn test_bonus_credits_and_records_settled() {
        let (service, wallet, pool) = service_with_balance(dec!(1000)).await;
        seed_player_with_session(&pool).await;

        let req = Hg5BonusRequest {
            player_id: "P1".to_string(),
            agent_id: "AG1".to_string(),
            bonus_id: "B9".to_string(),
            amount: dec!(25),
            event_time: EVENT_TIME,
        };
        let data = service.bonus(req.clone()).await.unwrap();

        assert_eq!(data.balance, "1025.00");
        assert_eq!(wallet.calls_of("bonus:"), vec!["bonus:bonus-B9:25"]);

        let trx = TransactionRepository::find_by_trx_id(&pool, "B9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trx.status, TransactionStatus::Settled);
        assert_eq!(trx.bet_amount_decimal(), Decimal::ZERO);

        // Replay of the same bonus id is rejected.
        let err = service.bonus(req).await.unwrap_err();
        assert!(matches!(err, AppError::TransactionAlreadyExists(_)));
        assert_eq!(wallet.calls_of("bonus:").len(), 1);
    }

    // ========== Auth / balance ==========

    #[tokio::test]
    async fn test_authenticate_returns_balance() {
        let (service, _wallet, pool) = service_with_balance(dec!(512.30)).await;
        seed_player_with_session(&pool).await;

        let req = Hg5AuthRequest {
            player_id: "P1".to_string(),
            token: "tok-1".to_string(),
        };
        let data = service.authenticate(req).await.unwrap();

        assert_eq!(data.player_id, "P1");
        assert_eq!(data.balance, "512.30");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let (service, _wallet, pool) = service_with_balance(dec!(100)).await;
        seed_player_with_session(&pool).await;

        let req = Hg5AuthRequest {
            player_id: "P1".to_string(),
            token: "tok-unknown".to_string(),
        };
        assert!(matches!(
            service.authenticate(req).await.unwrap_err(),
            AppError::InvalidToken
        ));
    }
}
