//! # Transaction Repository
//!
//! Database access layer for bet transaction records.
//!
//! The vendor-supplied trx id is the idempotency key: a UNIQUE constraint on
//! `trx_id` rejects concurrent duplicate inserts, and the settle/cancel
//! updates guard on `updated_at IS NULL` (respectively the current status) so
//! the terminal write happens exactly once even under concurrent duplicate
//! requests. Callers translate a zero-row update into the matching
//! already-settled domain error.
//!
//! Records are never deleted; the table doubles as the audit trail.

use super::models::{to_minor_units, BetTransaction, TransactionStatus};
use super::DbPool;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::query_as;

/// Transaction repository for database operations.
pub struct TransactionRepository;

impl TransactionRepository {
    /// Find a transaction by the vendor trx id.
    pub async fn find_by_trx_id(
        pool: &DbPool,
        trx_id: &str,
    ) -> Result<Option<BetTransaction>, sqlx::Error> {
        query_as::<_, BetTransaction>("SELECT * FROM bet_transactions WHERE trx_id = ?")
            .bind(trx_id)
            .fetch_optional(pool)
            .await
    }

    /// Create a pending bet record.
    ///
    /// Fails with a unique violation if the trx id is already recorded.
    pub async fn create_bet(
        pool: &DbPool,
        trx_id: &str,
        play_id: &str,
        game_code: Option<&str>,
        bet_amount: Decimal,
        bet_time: NaiveDateTime,
    ) -> Result<BetTransaction, sqlx::Error> {
        sqlx::query(
            "INSERT INTO bet_transactions (trx_id, play_id, game_code, bet_amount, bet_time, status)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(trx_id)
        .bind(play_id)
        .bind(game_code)
        .bind(to_minor_units(bet_amount))
        .bind(bet_time)
        .bind(TransactionStatus::Pending.to_string())
        .execute(pool)
        .await?;

        query_as::<_, BetTransaction>("SELECT * FROM bet_transactions WHERE trx_id = ?")
            .bind(trx_id)
            .fetch_one(pool)
            .await
    }

    /// Create a record that is settled on arrival (combined wager-and-payout
    /// rounds and bonus payouts).
    pub async fn create_settled(
        pool: &DbPool,
        trx_id: &str,
        play_id: &str,
        game_code: Option<&str>,
        bet_amount: Decimal,
        win_amount: Decimal,
        bet_time: NaiveDateTime,
        settle_time: NaiveDateTime,
    ) -> Result<BetTransaction, sqlx::Error> {
        sqlx::query(
            "INSERT INTO bet_transactions
                 (trx_id, play_id, game_code, bet_amount, win_amount, bet_time, settle_time, status, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(trx_id)
        .bind(play_id)
        .bind(game_code)
        .bind(to_minor_units(bet_amount))
        .bind(to_minor_units(win_amount))
        .bind(bet_time)
        .bind(settle_time)
        .bind(TransactionStatus::Settled.to_string())
        .bind(Utc::now())
        .execute(pool)
        .await?;

        query_as::<_, BetTransaction>("SELECT * FROM bet_transactions WHERE trx_id = ?")
            .bind(trx_id)
            .fetch_one(pool)
            .await
    }

    /// Mark a pending bet as settled.
    ///
    /// Guards on `updated_at IS NULL`: returns the number of affected rows,
    /// which is 0 when another writer already performed the terminal write.
    pub async fn settle(
        pool: &DbPool,
        trx_id: &str,
        win_amount: Decimal,
        settle_time: NaiveDateTime,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bet_transactions
             SET win_amount = ?, settle_time = ?, status = ?, updated_at = ?
             WHERE trx_id = ? AND updated_at IS NULL",
        )
        .bind(to_minor_units(win_amount))
        .bind(settle_time)
        .bind(TransactionStatus::Settled.to_string())
        .bind(Utc::now())
        .bind(trx_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Cancel a still-pending bet (single-transaction rollback path).
    ///
    /// Same zero-rows contract as [`Self::settle`].
    pub async fn cancel_pending(pool: &DbPool, trx_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bet_transactions
             SET status = ?, updated_at = ?
             WHERE trx_id = ? AND updated_at IS NULL",
        )
        .bind(TransactionStatus::Cancelled.to_string())
        .bind(Utc::now())
        .bind(trx_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Cancel any not-yet-cancelled record (batch reversal path).
    ///
    /// Unlike [`Self::cancel_pending`] this also reverses settled records,
    /// but a second cancel on the same trx id still affects 0 rows.
    pub async fn cancel(pool: &DbPool, trx_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bet_transactions
             SET status = ?, updated_at = ?
             WHERE trx_id = ? AND status != ?",
        )
        .bind(TransactionStatus::Cancelled.to_string())
        .bind(Utc::now())
        .bind(trx_id)
        .bind(TransactionStatus::Cancelled.to_string())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List a player's transactions, most recent first.
    pub async fn list_by_play_id(
        pool: &DbPool,
        play_id: &str,
        limit: i64,
    ) -> Result<Vec<BetTransaction>, sqlx::Error> {
        query_as::<_, BetTransaction>(
            "SELECT * FROM bet_transactions WHERE play_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(play_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
