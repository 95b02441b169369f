//! Donor repository trait definition.

use benefactor_types::donor::{Donor, UserId};
use benefactor_types::error::RepositoryError;

/// Repository trait for donor persistence.
///
/// Implementations live in benefactor-infra (e.g., SqliteDonorRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait DonorRepository: Send + Sync {
    /// Create a new donor. Fails with `Conflict` if the email is taken.
    fn create(
        &self,
        donor: &Donor,
    ) -> impl std::future::Future<Output = Result<Donor, RepositoryError>> + Send;

    /// Get the donor record of a user.
    fn get_by_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Donor>, RepositoryError>> + Send;

    /// Get a donor by email address (case-insensitive).
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Donor>, RepositoryError>> + Send;

    /// Replace the stored record, including its meta map. Returns the updated donor.
    fn update(
        &self,
        donor: &Donor,
    ) -> impl std::future::Future<Output = Result<Donor, RepositoryError>> + Send;
}
