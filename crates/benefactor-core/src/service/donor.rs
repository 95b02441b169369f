//! Donor management service.
//!
//! Registers donors and resolves the donor record behind a [`UserContext`].

use benefactor_types::donor::{CreateDonorRequest, Donor, UserContext, UserId};
use benefactor_types::error::{DonorError, RepositoryError};

use crate::repository::donor::DonorRepository;

/// Lowercase and trim an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural email check: one `@`, non-empty local part, and a
/// dotted domain without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Service for donor records.
pub struct DonorService<D: DonorRepository> {
    repo: D,
}

impl<D: DonorRepository> DonorService<D> {
    pub fn new(repo: D) -> Self {
        Self { repo }
    }

    #[cfg(test)]
    pub(crate) fn repo(&self) -> &D {
        &self.repo
    }

    /// Register a new donor.
    pub async fn register(&self, request: CreateDonorRequest) -> Result<Donor, DonorError> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(DonorError::InvalidEmail(request.email));
        }

        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        if first_name.is_empty() {
            return Err(DonorError::InvalidName("first name cannot be empty".to_string()));
        }
        if last_name.is_empty() {
            return Err(DonorError::InvalidName("last name cannot be empty".to_string()));
        }

        let donor = Donor::new(UserId::new(), email, first_name, last_name);
        let donor = self.repo.create(&donor).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => DonorError::EmailConflict(donor.email.clone()),
            other => DonorError::StorageError(other.to_string()),
        })?;

        tracing::info!(user_id = ?donor.user_id, "registered donor");
        Ok(donor)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Donor, DonorError> {
        self.repo
            .get_by_email(&normalize_email(email))
            .await
            .map_err(|e| DonorError::StorageError(e.to_string()))?
            .ok_or(DonorError::NotFound)
    }

    pub async fn get_by_user(&self, user_id: &UserId) -> Result<Donor, DonorError> {
        self.repo
            .get_by_user(user_id)
            .await
            .map_err(|e| DonorError::StorageError(e.to_string()))?
            .ok_or(DonorError::NotFound)
    }

    /// The donor record to show to `user`.
    ///
    /// Anonymous visitors, and users whose donor record is missing, get an
    /// all-empty donor rather than an error.
    pub async fn donor_for(&self, user: &UserContext) -> Result<Donor, DonorError> {
        let Some(user_id) = user.user_id() else {
            return Ok(Donor::anonymous());
        };

        match self.get_by_user(&user_id).await {
            Ok(donor) => Ok(donor),
            Err(DonorError::NotFound) => {
                tracing::warn!(%user_id, "authenticated user has no donor record");
                Ok(Donor::anonymous())
            }
            Err(e) => Err(e),
        }
    }

    /// Persist an edited donor record.
    pub async fn save(&self, donor: &Donor) -> Result<Donor, DonorError> {
        self.repo.update(donor).await.map_err(|e| match e {
            RepositoryError::NotFound => DonorError::NotFound,
            RepositoryError::Conflict(_) => DonorError::EmailConflict(donor.email.clone()),
            other => DonorError::StorageError(other.to_string()),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory donor repository shared by service tests.
    #[derive(Default)]
    pub(crate) struct MemoryDonorRepository {
        pub(crate) donors: Mutex<HashMap<UserId, Donor>>,
        pub(crate) updates: Mutex<usize>,
    }

    impl DonorRepository for MemoryDonorRepository {
        async fn create(&self, donor: &Donor) -> Result<Donor, RepositoryError> {
            let mut donors = self.donors.lock().unwrap();
            if donors.values().any(|d| d.email == donor.email) {
                return Err(RepositoryError::Conflict(donor.email.clone()));
            }
            let id = donor.user_id.ok_or(RepositoryError::NotFound)?;
            donors.insert(id, donor.clone());
            Ok(donor.clone())
        }

        async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Donor>, RepositoryError> {
            Ok(self.donors.lock().unwrap().get(user_id).cloned())
        }

        async fn get_by_email(&self, email: &str) -> Result<Option<Donor>, RepositoryError> {
            Ok(self
                .donors
                .lock()
                .unwrap()
                .values()
                .find(|d| d.email == email)
                .cloned())
        }

        async fn update(&self, donor: &Donor) -> Result<Donor, RepositoryError> {
            let id = donor.user_id.ok_or(RepositoryError::NotFound)?;
            let mut donors = self.donors.lock().unwrap();
            if !donors.contains_key(&id) {
                return Err(RepositoryError::NotFound);
            }
            if donors
                .values()
                .any(|d| d.user_id != donor.user_id && d.email == donor.email)
            {
                return Err(RepositoryError::Conflict(donor.email.clone()));
            }
            donors.insert(id, donor.clone());
            *self.updates.lock().unwrap() += 1;
            Ok(donor.clone())
        }
    }

    fn request(email: &str, first: &str, last: &str) -> CreateDonorRequest {
        CreateDonorRequest {
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.org"));
        assert!(is_valid_email("a.b+c@sub.example.co.uk"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@@example.org"));
        assert!(!is_valid_email("ada lovelace@example.org"));
        assert!(!is_valid_email("ada@example.org."));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = DonorService::new(MemoryDonorRepository::default());
        let donor = service
            .register(request("  Ada@Example.ORG ", " Ada ", "Lovelace"))
            .await
            .unwrap();
        assert_eq!(donor.email, "ada@example.org");
        assert_eq!(donor.first_name, "Ada");

        let found = service.get_by_email("ADA@example.org").await.unwrap();
        assert_eq!(found.user_id, donor.user_id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let service = DonorService::new(MemoryDonorRepository::default());
        service
            .register(request("ada@example.org", "Ada", "Lovelace"))
            .await
            .unwrap();

        let dup = service
            .register(request("ada@example.org", "Ada", "Byron"))
            .await;
        assert!(matches!(dup, Err(DonorError::EmailConflict(_))));

        let bad_email = service.register(request("nope", "Ada", "Lovelace")).await;
        assert!(matches!(bad_email, Err(DonorError::InvalidEmail(_))));

        let no_name = service.register(request("g@example.org", " ", "Hopper")).await;
        assert!(matches!(no_name, Err(DonorError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_donor_for_anonymous_and_missing() {
        let service = DonorService::new(MemoryDonorRepository::default());

        let anon = service.donor_for(&UserContext::Anonymous).await.unwrap();
        assert!(anon.user_id.is_none());
        assert_eq!(anon.full_name(), "");
        assert!(anon.meta.is_empty());

        let ghost = service
            .donor_for(&UserContext::Authenticated(UserId::new()))
            .await
            .unwrap();
        assert!(ghost.user_id.is_none());
        assert_eq!(ghost.email, "");
    }
}
