//! JSON response envelope.
//!
//! Every endpoint answers with the same wrapper:
//! `{success, data?, message?, errors?, details?, cached?, cache_expires_in?}`.
//! Optional fields are omitted entirely when absent, never serialized as
//! null.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::FieldErrors;

/// The response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_expires_in: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            details: None,
            cached: None,
            cache_expires_in: None,
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach supplementary details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach cache metadata (the user-list endpoint reports whether it was
    /// served from cache and how long entries live).
    #[must_use]
    pub fn with_cache_info(mut self, cached: bool, ttl_secs: u64) -> Self {
        self.cached = Some(cached);
        self.cache_expires_in = Some(format!("{ttl_secs} seconds"));
        self
    }
}

impl ApiResponse<()> {
    /// A successful response with a message and no data (deletes).
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
            details: None,
            cached: None,
            cache_expires_in: None,
        }
    }

    /// A failed response with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            details: None,
            cached: None,
            cache_expires_in: None,
        }
    }

    /// A failed validation response carrying the field-level error map.
    #[must_use]
    pub fn validation_failure(errors: FieldErrors) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_owned()),
            errors: Some(errors),
            details: Some("Check the highlighted fields and fix the errors".to_owned()),
            cached: None,
            cache_expires_in: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Wrap a response in 201 Created.
pub fn created<T: Serialize>(body: ApiResponse<T>) -> Response {
    (StatusCode::CREATED, body).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::data(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
        assert!(json.get("errors").is_none());
        assert!(json.get("cached").is_none());
    }

    #[test]
    fn test_message_envelope() {
        let json =
            serde_json::to_value(ApiResponse::message("User deleted").with_details("Gone")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "User deleted");
        assert_eq!(json["details"], "Gone");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_validation_failure_carries_field_map() {
        let mut errors = FieldErrors::new();
        errors
            .entry("email".to_owned())
            .or_default()
            .push("The email field is required.".to_owned());

        let json = serde_json::to_value(ApiResponse::validation_failure(errors)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(
            json["errors"]["email"][0],
            "The email field is required."
        );
    }

    #[test]
    fn test_cache_info_fields() {
        let json = serde_json::to_value(ApiResponse::data(()).with_cache_info(true, 10)).unwrap();
        assert_eq!(json["cached"], true);
        assert_eq!(json["cache_expires_in"], "10 seconds");
    }
}
