use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

/// Every recoverable rejection the operation surface can hand back to a
/// caller. Messages are specific enough to render to the end user as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotAuthorized(String),
    #[error("{0}")]
    StateConflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("payment gateway error: {0}")]
    ExternalService(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            ApiError::NotAuthorized(_) => (StatusCode::FORBIDDEN, "not_authorized"),
            ApiError::StateConflict(_) => (StatusCode::CONFLICT, "state_conflict"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::ExternalService(_) => (StatusCode::BAD_GATEWAY, "external_service"),
            ApiError::Database(diesel::result::Error::NotFound) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            ApiError::Database(diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )) => (StatusCode::CONFLICT, "state_conflict"),
            ApiError::Database(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = Json(json!({ "error": code, "message": self.to_string() }));
        (status, body).into_response()
    }
}

pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_categories_map_to_distinct_statuses() {
        let cases = [
            (
                ApiError::Validation("duration out of range".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::NotAuthorized("not your message".to_owned()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::StateConflict("offer already decided".to_owned()),
                StatusCode::CONFLICT,
            ),
            (ApiError::NotFound("listing"), StatusCode::NOT_FOUND),
            (
                ApiError::ExternalService("timeout".to_owned()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_code().0, expected);
        }
    }

    #[test]
    fn missing_row_is_not_found_not_internal() {
        let err = ApiError::from(diesel::result::Error::NotFound);
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
    }
}
