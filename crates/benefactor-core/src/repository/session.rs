//! Login session repository trait definition.

use benefactor_types::donor::UserId;
use benefactor_types::error::RepositoryError;

/// Repository trait for browser login sessions.
///
/// Tokens are opaque strings handed to the browser; implementations store
/// only a hash of each token.
pub trait SessionRepository: Send + Sync {
    /// Open a session for `user_id` and return its plaintext token.
    fn create(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<String, RepositoryError>> + Send;

    /// Resolve a token to the user it belongs to.
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send;

    /// Close a session. Unknown tokens are ignored.
    fn revoke(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
