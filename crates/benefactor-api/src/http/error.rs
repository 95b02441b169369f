//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use benefactor_types::error::{DonorError, ProfileError, RepositoryError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Profile(ProfileError),
    Donor(DonorError),
    Repository(RepositoryError),
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::Profile(e)
    }
}

impl From<DonorError> for AppError {
    fn from(e: DonorError) -> Self {
        AppError::Donor(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    /// Status code and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Profile(ProfileError::Validation { .. })
            | AppError::Profile(ProfileError::InvalidChoice { .. })
            | AppError::Profile(ProfileError::InvalidEmail(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            AppError::Profile(ProfileError::EmailConflict(_))
            | AppError::Donor(DonorError::EmailConflict(_)) => {
                (StatusCode::CONFLICT, "EMAIL_CONFLICT")
            }
            AppError::Profile(ProfileError::DonorNotFound) | AppError::Donor(DonorError::NotFound) => {
                (StatusCode::NOT_FOUND, "DONOR_NOT_FOUND")
            }
            AppError::Donor(DonorError::InvalidEmail(_)) | AppError::Donor(DonorError::InvalidName(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Repository(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Repository(RepositoryError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Profile(_) | AppError::Donor(_) | AppError::Repository(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Profile(e) => e.to_string(),
            AppError::Donor(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(%code, %message, "request failed");
        }

        let details = match &self {
            AppError::Profile(ProfileError::Validation { missing }) => {
                Some(serde_json::json!({ "missing": missing }))
            }
            _ => None,
        };

        let mut response = ApiResponse::error(code, &message, details).into_response();
        *response.status_mut() = status;
        response
    }
}
