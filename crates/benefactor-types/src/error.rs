use thiserror::Error;

/// Errors related to donor records.
#[derive(Debug, Error)]
pub enum DonorError {
    #[error("donor not found")]
    NotFound,

    #[error("email '{0}' is already registered")]
    EmailConflict(String),

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("invalid donor name: {0}")]
    InvalidName(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from assembling or processing the profile form.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("required fields are empty: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("'{field}' is not one of the available options")]
    InvalidChoice { field: String },

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("email '{0}' is already registered")]
    EmailConflict(String),

    #[error("no donor record for the current user")]
    DonorNotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from nonce key management.
#[derive(Debug, Error)]
pub enum NonceError {
    #[error("nonce key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("invalid nonce key: {0}")]
    InvalidKey(String),
}

/// Errors from repository operations (used by trait definitions in benefactor-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
