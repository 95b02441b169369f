//! SQLite session repository implementation.
//!
//! Only the SHA-256 hash of each session token is stored.

use benefactor_core::repository::session::SessionRepository;
use benefactor_types::donor::UserId;
use benefactor_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::format_datetime;
use super::pool::DatabasePool;
use crate::crypto::token::{generate_token, hash_token};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, user_id: &UserId) -> Result<String, RepositoryError> {
        let token = generate_token();

        let result = sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(hash_token(&token))
        .bind(user_id.to_string())
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(%user_id, "session opened");
                Ok(token)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn resolve(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let id: String = row
                    .try_get("user_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let user_id = id
                    .parse()
                    .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::donor::SqliteDonorRepository;
    use crate::sqlite::pool::test_pool;
    use benefactor_core::repository::donor::DonorRepository;
    use benefactor_types::donor::Donor;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let donors = SqliteDonorRepository::new(pool.clone());
        let sessions = SqliteSessionRepository::new(pool);

        let donor = Donor::new(UserId::new(), "ada@example.org", "Ada", "Lovelace");
        donors.create(&donor).await.unwrap();
        let user_id = donor.user_id.unwrap();

        let token = sessions.create(&user_id).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap(), Some(user_id));
        assert_eq!(sessions.resolve("not-a-token").await.unwrap(), None);

        sessions.revoke(&token).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap(), None);
        sessions.revoke(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_tokens_are_stored_hashed() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let donors = SqliteDonorRepository::new(pool.clone());
        let sessions = SqliteSessionRepository::new(pool.clone());

        let donor = Donor::new(UserId::new(), "ada@example.org", "Ada", "Lovelace");
        donors.create(&donor).await.unwrap();
        let token = sessions.create(&donor.user_id.unwrap()).await.unwrap();

        let (stored,): (String,) = sqlx::query_as("SELECT token_hash FROM sessions")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, hash_token(&token));
    }

    #[tokio::test]
    async fn test_session_for_unknown_user_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = SqliteSessionRepository::new(test_pool(&dir).await);

        let err = sessions.create(&UserId::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
