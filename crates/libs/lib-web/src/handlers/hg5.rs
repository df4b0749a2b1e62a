//! # Hg5 Callback Handlers
//!
//! HTTP endpoints for the Hg5 vendor contract.
//!
//! ## Endpoints
//!
//! - `POST /api/hg5/auth` - Authenticate a game-session token
//! - `POST /api/hg5/balance` - Balance query
//! - `POST /api/hg5/bet` - Place a bet (wager)
//! - `POST /api/hg5/settle` - Settle a bet (payout)
//! - `POST /api/hg5/bet-settle` - Combined wager-and-payout (arcade games)
//! - `POST /api/hg5/cancel` - Roll back an incomplete bet
//! - `POST /api/hg5/bonus` - Credit a promotional bonus
//!
//! The vendor expects HTTP 200 with a coded envelope on every outcome;
//! domain errors are mapped to the Hg5 code table below.

use crate::server::AppState;
use crate::services::Hg5Service;
use axum::{extract::State, Json};
use lib_core::dto::{
    Hg5AuthRequest, Hg5BalanceData, Hg5BalanceRequest, Hg5BetRequest, Hg5BetSettleRequest,
    Hg5BonusRequest, Hg5CancelRequest, Hg5Response, Hg5SettleRequest,
};
use lib_core::AppError;
use tracing::warn;

/// Map a domain error to the Hg5 numeric code string.
pub(crate) fn hg5_error_code(err: &AppError) -> &'static str {
    match err {
        AppError::InvalidInput(_) => "1000",
        AppError::InvalidToken => "1001",
        AppError::PlayerNotFound(_) => "1002",
        AppError::InvalidAgentId => "1003",
        AppError::InsufficientFunds => "1004",
        AppError::TransactionAlreadyExists(_) => "1005",
        AppError::TransactionNotFound(_) => "1006",
        AppError::TransactionAlreadySettled(_) => "1007",
        AppError::CurrencyNotSupported(_) => "1008",
        AppError::InvalidSignature | AppError::InvalidPublicKey => "1009",
        AppError::Wallet { .. } | AppError::WalletUnavailable(_) => "2001",
        _ => "9999",
    }
}

fn envelope(result: lib_core::Result<Hg5BalanceData>) -> Json<Hg5Response<Hg5BalanceData>> {
    match result {
        Ok(data) => Json(Hg5Response::ok(data)),
        Err(err) => {
            warn!("Hg5 callback rejected: {}", err);
            Json(Hg5Response::error(hg5_error_code(&err), err.user_message()))
        }
    }
}

fn service(state: &AppState) -> Hg5Service {
    Hg5Service::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.hg5.clone(),
    )
}

pub async fn auth(
    State(state): State<AppState>,
    Json(req): Json<Hg5AuthRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).authenticate(req).await)
}

pub async fn balance(
    State(state): State<AppState>,
    Json(req): Json<Hg5BalanceRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).balance(req).await)
}

pub async fn bet(
    State(state): State<AppState>,
    Json(req): Json<Hg5BetRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).bet(req).await)
}

pub async fn settle(
    State(state): State<AppState>,
    Json(req): Json<Hg5SettleRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).settle(req).await)
}

pub async fn bet_settle(
    State(state): State<AppState>,
    Json(req): Json<Hg5BetSettleRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).bet_settle(req).await)
}

pub async fn cancel(
    State(state): State<AppState>,
    Json(req): Json<Hg5CancelRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).cancel(req).await)
}

pub async fn bonus(
    State(state): State<AppState>,
    Json(req): Json<Hg5BonusRequest>,
) -> Json<Hg5Response<Hg5BalanceData>> {
    envelope(service(&state).bonus(req).await)
}
