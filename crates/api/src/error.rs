//! Unified error handling for the REST surface.
//!
//! Route handlers return `Result<_, ApiError>`; the `IntoResponse` impl maps
//! each variant to its status code and envelope. Store failures are captured
//! to Sentry (when configured), logged with full context, and masked before
//! they reach the client - raw database errors, SQL and bindings never leave
//! the process.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::credential::CredentialError;

/// Field name → list of human-readable messages for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Append a message to a field's error list.
pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_owned())
        .or_default()
        .push(message.to_owned());
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request input failed validation.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// An addressed entity does not exist.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Entity kind, capitalized for display ("User", "Product", "Link").
        resource: &'static str,
        id: i32,
    },

    /// The operation conflicts with current state.
    #[error("conflict: {message}")]
    Conflict { message: String, details: String },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cached computation failed (shared among coalesced waiters).
    #[error("cached computation failed: {0}")]
    CachedCompute(#[from] Arc<RepositoryError>),

    /// Credential hashing failed.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl ApiError {
    /// Build a `NotFound` for a user id.
    #[must_use]
    pub fn user_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "User",
            id,
        }
    }

    /// Build a `NotFound` for a product id.
    #[must_use]
    pub fn product_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "Product",
            id,
        }
    }

    /// Build a `NotFound` for a link id.
    #[must_use]
    pub fn link_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "Link",
            id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture unexpected failures before masking them
        if matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::CachedCompute(_)
                | Self::Credential(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiResponse::validation_failure(errors),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                ApiResponse::failure(format!("{resource} not found"))
                    .with_details(format!("{resource} with id {id} was not found in the system")),
            ),
            Self::Conflict { message, details } => (
                StatusCode::CONFLICT,
                ApiResponse::failure(message).with_details(details),
            ),
            // The repository can still surface a conflict or a missing row
            // when a pre-check raced another writer
            Self::Database(RepositoryError::Conflict(message)) => (
                StatusCode::CONFLICT,
                ApiResponse::failure("Conflict").with_details(message),
            ),
            Self::Database(RepositoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                ApiResponse::failure("Resource not found"),
            ),
            Self::Database(_) | Self::CachedCompute(_) | Self::Credential(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure("Internal server error")
                    .with_details("An unexpected error occurred. Try again."),
            ),
        };

        (status, body).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_maps_to_422() {
        let mut errors = FieldErrors::new();
        errors
            .entry("name".to_owned())
            .or_default()
            .push("The name field is required.".to_owned());
        assert_eq!(
            get_status(ApiError::Validation(errors)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(get_status(ApiError::user_not_found(9)), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(ApiError::product_not_found(9)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::Conflict {
            message: "Link already exists".to_owned(),
            details: "This user is already linked to this product".to_owned(),
        };
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_repository_conflict_maps_to_409() {
        let err = ApiError::Database(RepositoryError::Conflict("duplicate".to_owned()));
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_failure_is_masked_500() {
        let err = ApiError::Database(RepositoryError::DataCorruption(
            "secret sql detail".to_owned(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_masked_500_body_hides_detail() {
        let err = ApiError::Database(RepositoryError::DataCorruption(
            "secret sql detail".to_owned(),
        ));
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("secret sql detail"));
    }
}
