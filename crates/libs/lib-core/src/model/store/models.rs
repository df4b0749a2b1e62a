use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Player entity, created on first launch request (idempotent upsert keyed by
/// play id) and read on every transaction to resolve currency and existence.
#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: i64,
    pub play_id: String,
    pub username: String,
    pub currency: String,
    pub external_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Game-session token issued at launch and consulted during
/// authenticate/balance calls.
#[derive(Debug, Clone, FromRow)]
pub struct GameSession {
    pub id: i64,
    pub play_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl GameSession {
    /// Whether the session has passed its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Settled,
    Cancelled,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Settled => write!(f, "settled"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "settled" => Ok(TransactionStatus::Settled),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        // Fall back to Pending when the stored value is unrecognized.
        TransactionStatus::from_str(&s).unwrap_or(TransactionStatus::Pending)
    }
}

/// Bet transaction record, keyed by the vendor-supplied trx id.
///
/// Created on bet/wager; settled or cancelled exactly once (`updated_at`
/// non-null marks the terminal write); never deleted (audit trail).
/// Amounts are stored in minor units (cents); `bet_time`/`settle_time` are
/// wall-clock times at the platform reference offset.
#[derive(Debug, Clone, FromRow)]
pub struct BetTransaction {
    pub id: i64,
    pub trx_id: String,
    pub play_id: String,
    pub game_code: Option<String>,
    pub bet_amount: i64,
    pub win_amount: Option<i64>,
    pub bet_time: NaiveDateTime,
    pub settle_time: Option<NaiveDateTime>,
    #[sqlx(try_from = "String")]
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BetTransaction {
    /// Whether the terminal settle/cancel write has already happened.
    pub fn is_terminal(&self) -> bool {
        self.updated_at.is_some()
    }

    pub fn bet_amount_decimal(&self) -> Decimal {
        from_minor_units(self.bet_amount)
    }

    pub fn win_amount_decimal(&self) -> Option<Decimal> {
        self.win_amount.map(from_minor_units)
    }
}

/// Convert a 2-fraction-digit decimal amount to integer minor units.
///
/// Amounts are validated to at most 2 fraction digits before reaching the
/// store, so the conversion is exact.
pub fn to_minor_units(amount: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .unwrap_or(0)
}

/// Convert integer minor units back to a decimal amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}
