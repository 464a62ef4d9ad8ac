//! Failure → HTTP response mapping. Nothing below this layer knows about
//! status codes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};
use thiserror::Error;

use catalog_core::DomainError;
use catalog_products::{ServiceError, Violations};

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more field violations.
    #[error(transparent)]
    Validation(#[from] Violations),

    #[error("{0}")]
    NotFound(String),

    /// Malformed request (bad JSON, wrong types, bad path id).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    StorageUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(DomainError::NotFound(msg)) => ApiError::NotFound(msg),
            ServiceError::Domain(DomainError::InvalidId(msg)) => ApiError::BadRequest(msg),
            ServiceError::StorageUnavailable(e) => ApiError::StorageUnavailable(e.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(violations) => {
                let mut body = Map::new();
                for v in &violations {
                    body.entry(v.field)
                        .or_insert_with(|| Value::String(v.message.clone()));
                }
                body.insert("status".to_string(), status_value(status));
                (status, axum::Json(Value::Object(body))).into_response()
            }
            ApiError::StorageUnavailable(detail) => {
                tracing::error!(error = %detail, "storage unavailable");
                json_error(status, "storage unavailable")
            }
            other => json_error(status, other.to_string()),
        }
    }
}

/// `{"message": ..., "status": "<code>"}`
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
            "status": status_value(status),
        })),
    )
        .into_response()
}

fn status_value(status: StatusCode) -> Value {
    Value::String(status.as_u16().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_products::{NOT_FOUND_MESSAGE, ProductInput, RepositoryError};

    #[test]
    fn service_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(ServiceError::not_found()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::from(RepositoryError::unavailable("down"))).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DomainError::invalid_id("ProductId: bad")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_keeps_service_message() {
        match ApiError::from(ServiceError::not_found()) {
            ApiError::NotFound(msg) => assert_eq!(msg, NOT_FOUND_MESSAGE),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let violations = ProductInput::default().validate().unwrap_err();
        let err = ApiError::from(violations);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
