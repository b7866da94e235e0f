//! Error types for the API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventboard_core::MutationError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The `WebSocket` path named no known topic.
    #[error("unknown topic: {0}")]
    InvalidTopic(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::NotFound { .. } => Self::NotFound(err.to_string()),
            MutationError::Store { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidTopic(topic) => {
                (StatusCode::BAD_REQUEST, format!("unknown topic: {topic}"))
            }
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eventboard_store::StoreError;
    use eventboard_types::EntityKind;

    use super::*;

    #[test]
    fn mutation_errors_map_to_status() {
        let not_found = ApiError::from(MutationError::NotFound {
            entity: EntityKind::Event,
            id: String::from("e1"),
        });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let store = ApiError::from(MutationError::from(StoreError::DuplicateId {
            entity: EntityKind::User,
            id: String::from("u1"),
        }));
        assert_eq!(
            store.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_topic_is_bad_request() {
        let response = ApiError::InvalidTopic(String::from("nope")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn serialization_error_is_internal() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let api = ApiError::from(err);
        assert!(matches!(api, ApiError::Serialization(_)));
        assert_eq!(
            api.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
