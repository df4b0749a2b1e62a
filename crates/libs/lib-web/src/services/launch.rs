//! # Launch Service
//!
//! Operator-facing flow that puts a player into a game: idempotent player
//! upsert, game-session token issue, and the vendor call that produces the
//! URL the player's browser opens. Also serves the local transaction-history
//! query.

use lib_core::dto::{format_amount, LaunchGameRequest, LaunchGameResponse, TransactionView};
use lib_core::model::store::{PlayerRepository, SessionRepository, TransactionRepository};
use lib_core::{AppError, DbPool, Result};
use lib_utils::validation::validate_not_empty;
use lib_vendor::credentials::CredentialsResolver;
use lib_vendor::hg5::Hg5Api;
use lib_vendor::ors::OrsApi;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for launching game sessions and operator queries.
pub struct LaunchService {
    db: DbPool,
    credentials: Arc<CredentialsResolver>,
    hg5: Arc<dyn Hg5Api>,
    ors: Arc<dyn OrsApi>,
    session_ttl_minutes: i64,
}

impl LaunchService {
    pub fn new(
        db: DbPool,
        credentials: Arc<CredentialsResolver>,
        hg5: Arc<dyn Hg5Api>,
        ors: Arc<dyn OrsApi>,
        session_ttl_minutes: i64,
    ) -> Self {
        Self {
            db,
            credentials,
            hg5,
            ors,
            session_ttl_minutes,
        }
    }

    /// Launch an Hg5 game session.
    #[instrument(skip(self, req), fields(play_id = %req.play_id, game_code = %req.game_code))]
    pub async fn launch_hg5(&self, req: LaunchGameRequest) -> Result<LaunchGameResponse> {
        self.validate_launch(&req)?;
        let creds = self.credentials.get_by_currency(&req.currency)?;

        let player = PlayerRepository::upsert(&self.db, &req.play_id, &req.username, &req.currency)
            .await
            .map_err(AppError::from)?;

        let token = Uuid::new_v4().to_string();
        SessionRepository::create(&self.db, &player.play_id, &token, self.session_ttl_minutes)
            .await
            .map_err(AppError::from)?;

        let game_url = self
            .hg5
            .get_game_link(
                creds,
                &player.play_id,
                &token,
                &req.game_code,
                req.lang.as_deref(),
            )
            .await?;

        info!("Hg5 session launched: play_id={}", player.play_id);
        Ok(LaunchGameResponse { game_url, token })
    }

    /// Launch an Ors game session.
    #[instrument(skip(self, req), fields(play_id = %req.play_id, game_code = %req.game_code))]
    pub async fn launch_ors(&self, req: LaunchGameRequest) -> Result<LaunchGameResponse> {
        self.validate_launch(&req)?;
        let creds = self.credentials.get_by_currency(&req.currency)?;

        let player = PlayerRepository::upsert(&self.db, &req.play_id, &req.username, &req.currency)
            .await
            .map_err(AppError::from)?;

        let token = Uuid::new_v4().to_string();
        SessionRepository::create(&self.db, &player.play_id, &token, self.session_ttl_minutes)
            .await
            .map_err(AppError::from)?;

        let entered = self
            .ors
            .enter_game(creds, &player.play_id, &token, &req.game_code)
            .await?;

        if let Some(vendor_token) = &entered.vendor_token {
            PlayerRepository::set_external_token(&self.db, &player.play_id, vendor_token)
                .await
                .map_err(AppError::from)?;
        }

        info!("Ors session launched: play_id={}", player.play_id);
        Ok(LaunchGameResponse {
            game_url: entered.game_url,
            token,
        })
    }

    /// Local transaction history for a player, most recent first.
    pub async fn transaction_history(
        &self,
        play_id: &str,
        limit: i64,
    ) -> Result<Vec<TransactionView>> {
        PlayerRepository::find_by_play_id(&self.db, play_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::PlayerNotFound(play_id.to_string()))?;

        let rows = TransactionRepository::list_by_play_id(&self.db, play_id, limit)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|t| TransactionView {
                trx_id: t.trx_id.clone(),
                play_id: t.play_id.clone(),
                game_code: t.game_code.clone(),
                bet_amount: format_amount(t.bet_amount_decimal()),
                win_amount: t.win_amount_decimal().map(format_amount),
                status: t.status.to_string(),
                bet_time: t.bet_time.to_string(),
                settle_time: t.settle_time.map(|s| s.to_string()),
            })
            .collect())
    }

    fn validate_launch(&self, req: &LaunchGameRequest) -> Result<()> {
        validate_not_empty(&req.play_id, "play_id").map_err(AppError::InvalidInput)?;
        validate_not_empty(&req.username, "username").map_err(AppError::InvalidInput)?;
        validate_not_empty(&req.game_code, "game_code").map_err(AppError::InvalidInput)?;
        Ok(())
    }
}
