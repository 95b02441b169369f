//! SQLite donor repository implementation.
//!
//! Meta attributes are stored as one JSON object per donor.

use std::collections::BTreeMap;

use benefactor_core::repository::donor::DonorRepository;
use benefactor_types::donor::{Donor, UserId};
use benefactor_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `DonorRepository`.
pub struct SqliteDonorRepository {
    pool: DatabasePool,
}

impl SqliteDonorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct DonorRow {
    user_id: String,
    email: String,
    first_name: String,
    last_name: String,
    meta: String,
    created_at: String,
    updated_at: String,
}

impl DonorRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            meta: row.try_get("meta")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_donor(self) -> Result<Donor, RepositoryError> {
        let user_id: UserId = self
            .user_id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let meta: BTreeMap<String, String> = serde_json::from_str(&self.meta)
            .map_err(|e| RepositoryError::Query(format!("invalid meta JSON: {e}")))?;

        Ok(Donor {
            user_id: Some(user_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            meta,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn stored_id(donor: &Donor) -> Result<String, RepositoryError> {
    donor
        .user_id
        .map(|id| id.to_string())
        .ok_or_else(|| RepositoryError::Query("donor has no user id".to_string()))
}

fn map_write_error(e: sqlx::Error, donor: &Donor) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("email '{}' already exists", donor.email))
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

impl SqliteDonorRepository {
    async fn fetch_one_where(
        &self,
        clause: &str,
        value: &str,
    ) -> Result<Option<Donor>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT * FROM donors WHERE {clause}"))
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let donor_row =
                    DonorRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(donor_row.into_donor()?))
            }
            None => Ok(None),
        }
    }
}

impl DonorRepository for SqliteDonorRepository {
    async fn create(&self, donor: &Donor) -> Result<Donor, RepositoryError> {
        let meta_json =
            serde_json::to_string(&donor.meta).map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO donors (user_id, email, first_name, last_name, meta, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(stored_id(donor)?)
        .bind(&donor.email)
        .bind(&donor.first_name)
        .bind(&donor.last_name)
        .bind(&meta_json)
        .bind(format_datetime(&donor.created_at))
        .bind(format_datetime(&donor.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, donor))?;

        Ok(donor.clone())
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Donor>, RepositoryError> {
        self.fetch_one_where("user_id = ?", &user_id.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Donor>, RepositoryError> {
        self.fetch_one_where("email = ? COLLATE NOCASE", email).await
    }

    async fn update(&self, donor: &Donor) -> Result<Donor, RepositoryError> {
        let meta_json =
            serde_json::to_string(&donor.meta).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE donors SET email = ?, first_name = ?, last_name = ?, meta = ?, updated_at = ?
             WHERE user_id = ?",
        )
        .bind(&donor.email)
        .bind(&donor.first_name)
        .bind(&donor.last_name)
        .bind(&meta_json)
        .bind(format_datetime(&donor.updated_at))
        .bind(stored_id(donor)?)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, donor))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(donor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use benefactor_types::donor::meta;

    fn make_donor(email: &str) -> Donor {
        Donor::new(UserId::new(), email, "Ada", "Lovelace")
    }

    #[tokio::test]
    async fn test_create_and_get_donor() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        let mut donor = make_donor("ada@example.org");
        donor.set_meta(meta::CITY, "London");
        repo.create(&donor).await.unwrap();

        let by_user = repo
            .get_by_user(&donor.user_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.email, "ada@example.org");
        assert_eq!(by_user.get(meta::CITY), "London");

        let by_email = repo.get_by_email("ADA@example.org").await.unwrap().unwrap();
        assert_eq!(by_email.user_id, donor.user_id);
    }

    #[tokio::test]
    async fn test_get_missing_donor() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        assert!(repo.get_by_user(&UserId::new()).await.unwrap().is_none());
        assert!(repo.get_by_email("nobody@example.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        repo.create(&make_donor("ada@example.org")).await.unwrap();
        let err = repo.create(&make_donor("ada@example.org")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_meta() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        let mut donor = make_donor("ada@example.org");
        donor.set_meta(meta::CITY, "London");
        repo.create(&donor).await.unwrap();

        donor.first_name = "Augusta Ada".to_string();
        donor.meta.clear();
        donor.set_meta(meta::COUNTRY, "GB");
        repo.update(&donor).await.unwrap();

        let stored = repo
            .get_by_user(&donor.user_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.first_name, "Augusta Ada");
        assert_eq!(stored.get(meta::CITY), "");
        assert_eq!(stored.get(meta::COUNTRY), "GB");
    }

    #[tokio::test]
    async fn test_update_missing_donor_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        let err = repo.update(&make_donor("ghost@example.org")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_email_to_taken_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteDonorRepository::new(test_pool(&dir).await);

        repo.create(&make_donor("ada@example.org")).await.unwrap();
        let mut grace = make_donor("grace@example.org");
        repo.create(&grace).await.unwrap();

        grace.email = "ada@example.org".to_string();
        let err = repo.update(&grace).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
