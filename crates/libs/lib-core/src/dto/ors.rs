//! # Ors Data Transfer Objects
//!
//! Request and response structures for the Ors vendor callback contract.
//!
//! Ors speaks snake_case JSON and authenticates every callback with a
//! payload signature plus an `X-Public-Key` header. Its transfer endpoint is
//! batched: each record is a completed round (wager and payout in one), and
//! the response carries one outcome per input record, in input order, with
//! numeric codes (`"0"` success) and a zero balance on per-record failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One completed round inside a transfer batch.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsTransferRecord {
    /// Idempotency key for this record.
    pub transaction_id: String,
    pub round_id: String,
    /// Optional linkage to a main-game round; may reference a round the
    /// gateway never stored.
    #[serde(default)]
    pub main_round_id: Option<String>,
    pub game_code: String,
    pub bet_amount: Decimal,
    pub win_amount: Decimal,
    pub event_time: i64,
}

/// Batched transfer callback.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsTransferRequest {
    pub player_id: String,
    /// Net credit change of the whole batch: Σwin − Σbet. Cross-checked
    /// against the records before any record is processed.
    pub total_amount: Decimal,
    pub records: Vec<OrsTransferRecord>,
    pub signature: String,
}

/// One reversal inside a cancel batch.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsCancelRecord {
    pub transaction_id: String,
}

/// Batched cancel callback.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsCancelRequest {
    pub player_id: String,
    pub records: Vec<OrsCancelRecord>,
    pub signature: String,
}

/// Balance query.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsBalanceRequest {
    pub player_id: String,
    pub signature: String,
}

/// Per-record outcome; order and cardinality always match the input batch.
#[derive(Debug, Clone, Serialize)]
pub struct OrsRecordOutcome {
    pub transaction_id: String,
    pub code: String,
    /// Post-call balance as a decimal string; `"0.00"` on failure.
    pub balance: String,
}

impl OrsRecordOutcome {
    pub fn ok(transaction_id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            code: "0".to_string(),
            balance: super::format_amount(balance),
        }
    }

    pub fn error(transaction_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            code: code.into(),
            balance: "0.00".to_string(),
        }
    }
}

/// Ors response envelope; `code` is `"0"` when the request itself was
/// accepted (individual records may still carry their own error codes).
#[derive(Debug, Clone, Serialize)]
pub struct OrsResponse<T: Serialize> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> OrsResponse<T> {
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

/// Payload of a successful transfer or cancel batch.
#[derive(Debug, Clone, Serialize)]
pub struct OrsBatchData {
    pub player_id: String,
    pub results: Vec<OrsRecordOutcome>,
}

/// Payload of a successful balance query.
#[derive(Debug, Clone, Serialize)]
pub struct OrsBalanceData {
    pub player_id: String,
    pub currency: String,
    pub balance: String,
}
