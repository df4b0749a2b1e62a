//! # Hg5 Data Transfer Objects
//!
//! Request and response structures for the Hg5 vendor callback contract.
//!
//! Hg5 sends camelCase JSON and authenticates with the game-session token it
//! received in the launch URL, plus the configured agent id on every
//! transactional call. Monetary amounts travel as 2-fraction-digit decimal
//! strings (e.g. `"200.00"`); event times as epoch milliseconds.
//!
//! Responses always use HTTP 200 with a coded envelope; `"0"` is success.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Session authentication call issued when the game client connects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5AuthRequest {
    pub player_id: String,
    pub token: String,
}

/// Balance query for an authenticated session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5BalanceRequest {
    pub player_id: String,
    pub token: String,
}

/// Single bet (wager) callback.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5BetRequest {
    pub player_id: String,
    pub agent_id: String,
    pub token: String,
    pub game_code: String,
    /// Round id; doubles as the idempotency key.
    pub game_round: String,
    pub amount: Decimal,
    pub event_time: i64,
}

/// Settle (payout) callback for a previously placed bet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5SettleRequest {
    pub player_id: String,
    pub agent_id: String,
    pub game_round: String,
    pub win_amount: Decimal,
    pub event_time: i64,
}

/// Combined wager-and-payout callback used by arcade games that settle a
/// round in a single call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5BetSettleRequest {
    pub player_id: String,
    pub agent_id: String,
    pub token: String,
    pub game_code: String,
    pub game_round: String,
    pub bet_amount: Decimal,
    pub win_amount: Decimal,
    pub event_time: i64,
}

/// Rollback callback for a bet whose round never completed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5CancelRequest {
    pub player_id: String,
    pub agent_id: String,
    pub game_round: String,
    pub event_time: i64,
}

/// Promotional bonus payout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5BonusRequest {
    pub player_id: String,
    pub agent_id: String,
    /// Vendor bonus id; doubles as the idempotency key.
    pub bonus_id: String,
    pub amount: Decimal,
    pub event_time: i64,
}

/// Hg5 response envelope; every callback answers HTTP 200 with one of these.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5Response<T: Serialize> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Hg5Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: "0".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}

/// Player/balance payload returned by auth, balance and every transactional
/// callback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hg5BalanceData {
    pub player_id: String,
    pub currency: String,
    /// Post-call balance, 2-fraction-digit decimal string.
    pub balance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bet_request_rejects_missing_field() {
        // gameRound absent: the contract fails before any orchestrator call.
        let body = r#"{
            "playerId": "P1",
            "agentId": "AG1",
            "token": "tok",
            "gameCode": "slot-7",
            "amount": "200.00",
            "eventTime": 1704067200000
        }"#;
        assert!(serde_json::from_str::<Hg5BetRequest>(body).is_err());
    }

    #[test]
    fn test_bet_request_parses_camel_case() {
        let body = r#"{
            "playerId": "P1",
            "agentId": "AG1",
            "token": "tok",
            "gameCode": "slot-7",
            "gameRound": "R1",
            "amount": "200.00",
            "eventTime": 1704067200000
        }"#;
        let req: Hg5BetRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.game_round, "R1");
        assert_eq!(req.amount.to_string(), "200.00");
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let resp: Hg5Response<Hg5BalanceData> = Hg5Response::error("1004", "insufficient funds");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], "1004");
        assert!(json.get("data").is_none());
    }
}
