use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// JSON error body `{ "error": ..., "details": ... }` with an HTTP status.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, details: Option<String>) -> Self {
        Self { status, error: error.to_string(), details }
    }

    pub fn unauthorized(details: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(details.to_string()))
    }

    pub fn forbidden(details: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(details.to_string()))
    }

    pub fn not_found(details: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(details.to_string()))
    }

    pub fn bad_request(details: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(details.to_string()))
    }

    /// 500 with a generic body; the cause only goes to the log.
    pub fn internal(cause: &dyn std::fmt::Display) -> Self {
        error!(error = %cause, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some("an unexpected error occurred".into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, "request failed");
        }
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Forbidden(msg) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some(msg)),
            other => JsonApiError::internal(&other),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            AuthError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::NotFound => JsonApiError::not_found("user not found"),
            AuthError::Unauthorized | AuthError::TokenError(_) => {
                warn!(code = e.code(), error = %e, "authentication failed");
                JsonApiError::unauthorized(&e.to_string())
            }
            AuthError::HashError(_) | AuthError::Repository(_) => JsonApiError::internal(&e),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rej: JsonRejection) -> Self {
        match rej {
            JsonRejection::MissingJsonContentType(_) => {
                JsonApiError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type", Some(rej.body_text()))
            }
            _ => JsonApiError::bad_request(&rej.body_text()),
        }
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rej: PathRejection) -> Self {
        JsonApiError::bad_request(&rej.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rej: QueryRejection) -> Self {
        JsonApiError::bad_request(&rej.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::Db("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Conflict).status, StatusCode::CONFLICT);
        assert_eq!(JsonApiError::from(AuthError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(AuthError::TokenError("x".into())).status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let e = JsonApiError::from(ServiceError::Db("relation \"review\" does not exist".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        let details = e.details.unwrap_or_default();
        assert!(!details.contains("relation"));
        assert_eq!(details, "an unexpected error occurred");

        let e = JsonApiError::from(AuthError::Repository("connection refused".into()));
        assert!(!e.details.unwrap_or_default().contains("refused"));
    }

    #[test]
    fn body_carries_error_and_details() {
        let e = JsonApiError::not_found("game not found");
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Not Found", "details": "game not found"}));
    }
}
