//! # Session Repository
//!
//! Database access layer for game-session tokens.

use super::models::GameSession;
use super::DbPool;
use chrono::{Duration, Utc};
use sqlx::query_as;

/// Game-session repository for database operations.
pub struct SessionRepository;

impl SessionRepository {
    /// Create a new game session for a player.
    ///
    /// The session expires `ttl_minutes` after creation; a new launch always
    /// issues a fresh token, older tokens for the same player stay valid
    /// until they expire.
    pub async fn create(
        pool: &DbPool,
        play_id: &str,
        token: &str,
        ttl_minutes: i64,
    ) -> Result<GameSession, sqlx::Error> {
        let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

        let result =
            sqlx::query("INSERT INTO game_sessions (play_id, token, expires_at) VALUES (?, ?, ?)")
                .bind(play_id)
                .bind(token)
                .bind(expires_at)
                .execute(pool)
                .await?;

        let id = result.last_insert_rowid();

        query_as::<_, GameSession>("SELECT * FROM game_sessions WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a session by player and presented token.
    pub async fn find_by_play_id_and_token(
        pool: &DbPool,
        play_id: &str,
        token: &str,
    ) -> Result<Option<GameSession>, sqlx::Error> {
        query_as::<_, GameSession>("SELECT * FROM game_sessions WHERE play_id = ? AND token = ?")
            .bind(play_id)
            .bind(token)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::test_support::setup_test_db;

    #[tokio::test]
    async fn test_create_and_find_session() {
        let pool = setup_test_db().await;

        let created = SessionRepository::create(&pool, "P1", "tok-abc", 30)
            .await
            .unwrap();
        assert_eq!(created.play_id, "P1");
        assert!(!created.is_expired(Utc::now()));

        let found = SessionRepository::find_by_play_id_and_token(&pool, "P1", "tok-abc")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_find_with_wrong_token() {
        let pool = setup_test_db().await;

        SessionRepository::create(&pool, "P1", "tok-abc", 30)
            .await
            .unwrap();

        let found = SessionRepository::find_by_play_id_and_token(&pool, "P1", "tok-other")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_session_expiry_window() {
        let pool = setup_test_db().await;

        let session = SessionRepository::create(&pool, "P1", "tok-abc", 1)
            .await
            .unwrap();

        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(Utc::now() + Duration::minutes(2)));
    }
}
