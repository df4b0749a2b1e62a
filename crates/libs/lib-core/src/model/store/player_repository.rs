//! # Player Repository
//!
//! Database access layer for player records.
//!
//! Players are created lazily on the first launch request for a play id; the
//! upsert is idempotent so replayed launch requests never fail on the unique
//! constraint.

use super::models::Player;
use super::DbPool;
use sqlx::query_as;

/// Player repository for database operations.
pub struct PlayerRepository;

impl PlayerRepository {
    /// Find a player by their external play id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Player))` - Player found
    /// * `Ok(None)` - No player with that play id
    /// * `Err(sqlx::Error)` - Database error occurred
    pub async fn find_by_play_id(
        pool: &DbPool,
        play_id: &str,
    ) -> Result<Option<Player>, sqlx::Error> {
        query_as::<_, Player>("SELECT * FROM players WHERE play_id = ?")
            .bind(play_id)
            .fetch_optional(pool)
            .await
    }

    /// Idempotently create a player keyed by play id.
    ///
    /// A replayed launch for an existing play id leaves the stored record
    /// untouched and returns it.
    pub async fn upsert(
        pool: &DbPool,
        play_id: &str,
        username: &str,
        currency: &str,
    ) -> Result<Player, sqlx::Error> {
        sqlx::query(
            "INSERT INTO players (play_id, username, currency) VALUES (?, ?, ?)
             ON CONFLICT(play_id) DO NOTHING",
        )
        .bind(play_id)
        .bind(username)
        .bind(currency)
        .execute(pool)
        .await?;

        query_as::<_, Player>("SELECT * FROM players WHERE play_id = ?")
            .bind(play_id)
            .fetch_one(pool)
            .await
    }

    /// Store the vendor-issued external token for a player.
    pub async fn set_external_token(
        pool: &DbPool,
        play_id: &str,
        external_token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE players SET external_token = ? WHERE play_id = ?")
            .bind(external_token)
            .bind(play_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
