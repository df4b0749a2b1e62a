//! # Ors Callback Handlers
//!
//! HTTP endpoints for the Ors vendor contract.
//!
//! ## Endpoints
//!
//! - `POST /api/ors/transfer` - Batched completed rounds
//! - `POST /api/ors/cancel` - Batched reversals
//! - `POST /api/ors/balance` - Balance query
//!
//! Batch responses always carry one entry per input record, in input order;
//! a record's failure is a per-record code with a zero balance, never an
//! aborted batch. Request-level failures (signature, public key, unknown
//! player, total mismatch) reject the whole batch before any side effect.

use crate::server::AppState;
use crate::services::ors::RecordOutcome;
use crate::services::OrsService;
use axum::http::HeaderMap;
use axum::{extract::State, Json};
use lib_core::dto::{
    OrsBalanceData, OrsBalanceRequest, OrsBatchData, OrsCancelRequest, OrsRecordOutcome,
    OrsResponse, OrsTransferRequest,
};
use lib_core::AppError;
use tracing::warn;

/// Map a domain error to the Ors numeric code string.
pub(crate) fn ors_error_code(err: &AppError) -> &'static str {
    match err {
        AppError::InvalidInput(_) => "100",
        AppError::InvalidSignature => "101",
        AppError::InvalidPublicKey => "102",
        AppError::PlayerNotFound(_) => "103",
        AppError::CurrencyNotSupported(_) => "104",
        AppError::InsufficientFunds => "201",
        AppError::TransactionAlreadyExists(_) => "202",
        AppError::TransactionNotFound(_) => "203",
        AppError::TransactionAlreadySettled(_) => "204",
        AppError::Wallet { .. } | AppError::WalletUnavailable(_) => "301",
        _ => "999",
    }
}

/// Flatten orchestrator outcomes into the vendor's per-record envelope,
/// preserving order and cardinality.
fn flatten(player_id: String, outcomes: Vec<RecordOutcome>) -> OrsBatchData {
    let results = outcomes
        .into_iter()
        .map(|o| match o.result {
            Ok(balance) => OrsRecordOutcome::ok(o.transaction_id, balance),
            Err(err) => OrsRecordOutcome::error(o.transaction_id, ors_error_code(&err)),
        })
        .collect();

    OrsBatchData { player_id, results }
}

fn public_key_header(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-public-key").and_then(|v| v.to_str().ok())
}

fn service(state: &AppState) -> OrsService {
    OrsService::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.ors.clone(),
    )
}

pub async fn transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OrsTransferRequest>,
) -> Json<OrsResponse<OrsBatchData>> {
    let player_id = req.player_id.clone();
    match service(&state)
        .transfer(public_key_header(&headers), req)
        .await
    {
        Ok(outcomes) => Json(OrsResponse::ok(flatten(player_id, outcomes))),
        Err(err) => {
            warn!("Ors transfer rejected: {}", err);
            Json(OrsResponse::error(ors_error_code(&err), err.user_message()))
        }
    }
}

pub async fn cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OrsCancelRequest>,
) -> Json<OrsResponse<OrsBatchData>> {
    let player_id = req.player_id.clone();
    match service(&state)
        .cancel(public_key_header(&headers), req)
        .await
    {
        Ok(outcomes) => Json(OrsResponse::ok(flatten(player_id, outcomes))),
        Err(err) => {
            warn!("Ors cancel rejected: {}", err);
            Json(OrsResponse::error(ors_error_code(&err), err.user_message()))
        }
    }
}

pub async fn balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OrsBalanceRequest>,
) -> Json<OrsResponse<OrsBalanceData>> {
    match service(&state)
        .balance(public_key_header(&headers), req)
        .await
    {
        Ok(data) => Json(OrsResponse::ok(data)),
        Err(err) => {
            warn!("Ors balance rejected: {}", err);
            Json(OrsResponse::error(ors_error_code(&err), err.user_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_code_table() {
        assert_eq!(ors_error_code(&AppError::InvalidSignature), "101");
        assert_eq!(ors_error_code(&AppError::InvalidPublicKey), "102");
        assert_eq!(ors_error_code(&AppError::PlayerNotFound("P1".into())), "103");
        assert_eq!(ors_error_code(&AppError::InsufficientFunds), "201");
        assert_eq!(
            ors_error_code(&AppError::TransactionAlreadyExists("T1".into())),
            "202"
        );
        assert_eq!(
            ors_error_code(&AppError::TransactionAlreadySettled("T1".into())),
            "204"
        );
        assert_eq!(ors_error_code(&AppError::Wallet { status: 2207 }), "301");
    }

    #[test]
    fn test_flatten_preserves_order_and_maps_errors() {
        let outcomes = vec![
            RecordOutcome {
                transaction_id: "T1".to_string(),
                result: Ok(dec!(1005)),
            },
            RecordOutcome {
                transaction_id: "T2".to_string(),
                result: Err(AppError::InsufficientFunds),
            },
        ];

        let data = flatten("P1".to_string(), outcomes);

        assert_eq!(data.results.len(), 2);
        assert_eq!(data.results[0].transaction_id, "T1");
        assert_eq!(data.results[0].code, "0");
        assert_eq!(data.results[0].balance, "1005.00");
        assert_eq!(data.results[1].transaction_id, "T2");
        assert_eq!(data.results[1].code, "201");
        assert_eq!(data.results[1].balance, "0.00");
    }
}
