//! # Internal Operator Handlers
//!
//! Token-guarded endpoints for the operator platform: launching game
//! sessions and querying orders/records.
//!
//! ## Endpoints
//!
//! - `POST /api/launch/hg5` - Launch an Hg5 game session
//! - `POST /api/launch/ors` - Launch an Ors game session
//! - `GET  /api/transactions?play_id=..&limit=..` - Local transaction history
//! - `GET  /api/hg5/orders/{trx_id}?play_id=..` - Vendor-side order state
//! - `GET  /api/hg5/orders/{trx_id}/detail?play_id=..&lang=..` - Order detail link
//! - `GET  /api/ors/records?play_id=..&from=..&to=..` - Vendor betting records
//! - `GET  /api/ors/games?currency=..` - Vendor game catalogue
//!
//! The auth middleware verifies the bearer token and injects `Claims`; each
//! handler then enforces the scope it needs (launch endpoints require
//! `launch`, query endpoints require `reports`). Errors use `AppError`'s
//! HTTP status/JSON envelope.

use crate::server::AppState;
use crate::services::{Hg5Service, LaunchService, OrsService};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use lib_auth::{Claims, SCOPE_LAUNCH, SCOPE_REPORTS};
use lib_core::dto::{LaunchGameRequest, LaunchGameResponse, TransactionView};
use lib_core::{AppError, Result};
use lib_vendor::hg5::Hg5Order;
use lib_vendor::ors::{OrsBettingRecord, OrsGameInfo};
use serde::Deserialize;
use tracing::info;

fn require_scope(claims: &Claims, scope: &str) -> Result<()> {
    if !claims.allows(scope) {
        return Err(AppError::InvalidToken);
    }
    Ok(())
}

fn launch_service(state: &AppState) -> LaunchService {
    LaunchService::new(
        state.db.clone(),
        state.credentials.clone(),
        state.hg5.clone(),
        state.ors.clone(),
        state.config.session_ttl_minutes,
    )
}

pub async fn launch_hg5(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<LaunchGameRequest>,
) -> Result<Json<LaunchGameResponse>> {
    require_scope(&claims, SCOPE_LAUNCH)?;
    info!("Launch hg5 requested by operator {}", claims.operator);
    let resp = launch_service(&state).launch_hg5(req).await?;
    Ok(Json(resp))
}

pub async fn launch_ors(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<LaunchGameRequest>,
) -> Result<Json<LaunchGameResponse>> {
    require_scope(&claims, SCOPE_LAUNCH)?;
    info!("Launch ors requested by operator {}", claims.operator);
    let resp = launch_service(&state).launch_ors(req).await?;
    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub play_id: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

pub async fn transaction_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<TransactionView>>> {
    require_scope(&claims, SCOPE_REPORTS)?;
    let rows = launch_service(&state)
        .transaction_history(&params.play_id, params.limit)
        .await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub play_id: String,
    #[serde(default)]
    pub lang: Option<String>,
}

pub async fn hg5_order_query(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trx_id): Path<String>,
    Query(params): Query<OrderQuery>,
) -> Result<Json<Hg5Order>> {
    require_scope(&claims, SCOPE_REPORTS)?;
    let service = Hg5Service::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.hg5.clone(),
    );
    let order = service.order_query(&params.play_id, &trx_id).await?;
    Ok(Json(order))
}

pub async fn hg5_order_detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(trx_id): Path<String>,
    Query(params): Query<OrderQuery>,
) -> Result<Json<serde_json::Value>> {
    require_scope(&claims, SCOPE_REPORTS)?;
    let service = Hg5Service::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.hg5.clone(),
    );
    let url = service
        .order_detail_link(&params.play_id, &trx_id, params.lang.as_deref())
        .await?;
    Ok(Json(serde_json::json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub play_id: String,
    pub from: i64,
    pub to: i64,
}

pub async fn ors_betting_records(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<Vec<OrsBettingRecord>>> {
    require_scope(&claims, SCOPE_REPORTS)?;
    let service = OrsService::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.ors.clone(),
    );
    let records = service
        .betting_records(&params.play_id, params.from, params.to)
        .await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    pub currency: String,
}

pub async fn ors_game_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<GamesQuery>,
) -> Result<Json<Vec<OrsGameInfo>>> {
    require_scope(&claims, SCOPE_REPORTS)?;
    let service = OrsService::new(
        state.db.clone(),
        state.credentials.clone(),
        state.wallet.clone(),
        state.ors.clone(),
    );
    let games = service.game_list(&params.currency).await?;
    Ok(Json(games))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_auth::token::TOKEN_ISSUER;

    fn claims_with(scopes: &[&str]) -> Claims {
        Claims {
            sub: "op-7".to_string(),
            operator: "ops-portal".to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            iss: TOKEN_ISSUER.to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require_scope() {
        let claims = claims_with(&[SCOPE_LAUNCH]);

        assert!(require_scope(&claims, SCOPE_LAUNCH).is_ok());
        assert!(matches!(
            require_scope(&claims, SCOPE_REPORTS),
            Err(AppError::InvalidToken)
        ));
    }
}
