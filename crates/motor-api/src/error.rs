//! API error types and HTTP response mapping.

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use motor_core::Error as CoreError;
use motor_core::IdParseError;

use crate::context::REQUEST_ID_HEADER;

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Standard JSON error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message (safe for clients).
    pub message: String,
    /// The raw input value that was rejected, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<String>,
    /// Optional request ID for correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// HTTP API error with stable machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    rejected_value: Option<String>,
    request_id: Option<String>,
}

impl ApiError {
    /// Returns an error response for invalid input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Returns an error response for authorization failures.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// Returns an error response for missing resources.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Returns an internal error response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    /// Attaches the raw input value that caused the error.
    #[must_use]
    pub fn with_rejected_value(mut self, value: impl Into<String>) -> Self {
        self.rejected_value = Some(value.into());
        self
    }

    /// Attaches a request ID for correlation.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rejected input value, if one was attached.
    #[must_use]
    pub fn rejected_value(&self) -> Option<&str> {
        self.rejected_value.as_deref()
    }

    /// Returns the request ID, if one was attached.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            rejected_value: None,
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = self.request_id;
        let mut response = (
            self.status,
            Json(ApiErrorResponse {
                status: self.status.as_u16(),
                code: self.code.to_string(),
                message: self.message,
                rejected_value: self.rejected_value,
                request_id: request_id.clone(),
            }),
        )
            .into_response();

        if let Some(request_id) = request_id {
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
        }

        response
    }
}

impl From<CoreError> for ApiError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidId { message } | CoreError::InvalidInput(message) => {
                Self::bad_request(message)
            }
            CoreError::Forbidden(message) => Self::forbidden(message),
            CoreError::NotFound(message) => Self::not_found(message),
            CoreError::ResourceNotFound { resource_type, id } => {
                Self::not_found(format!("{resource_type} not found: {id}"))
            }
            CoreError::Serialization { message } | CoreError::Internal { message } => {
                Self::internal(message)
            }
        }
    }
}

impl From<IdParseError> for ApiError {
    fn from(value: IdParseError) -> Self {
        Self::bad_request(value.to_string()).with_rejected_value(value.raw())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_status_class() {
        let cases = [
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (CoreError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                CoreError::resource_not_found("VehicleToEngineConfig", 7),
                StatusCode::NOT_FOUND,
            ),
            (CoreError::InvalidInput("bad vin".into()), StatusCode::BAD_REQUEST),
            (CoreError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                CoreError::Serialization {
                    message: "eof".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (core, status) in cases {
            assert_eq!(ApiError::from(core).status(), status);
        }
    }

    #[test]
    fn test_id_parse_error_carries_rejected_value() {
        let err = motor_core::VehicleToEngineConfigId::parse("123ABC").unwrap_err();
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), "BAD_REQUEST");
        assert_eq!(api.rejected_value(), Some("123ABC"));
    }

    #[test]
    fn test_request_id_is_echoed_in_header() {
        let response = ApiError::not_found("missing")
            .with_request_id("01JABCDEF")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("01JABCDEF")
        );
    }
}
