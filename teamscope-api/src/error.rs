/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`, which converts to a JSON body
/// of the form `{"message": "..."}` with an optional `docs` link.
///
/// # Example
///
/// ```
/// use axum::http::StatusCode;
/// use axum::response::IntoResponse;
/// use teamscope_api::error::ApiError;
///
/// let response = ApiError::BadRequest("invalid token".to_string()).into_response();
/// assert_eq!(response.status(), StatusCode::BAD_REQUEST);
/// ```

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use teamscope_shared::{auth::middleware::AuthError, service::TeamAccessError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized,

    /// Not found (404), optionally pointing at documentation
    NotFound {
        message: String,
        docs: Option<String>,
    },

    /// Internal server error (500); the detail is logged, never returned
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Documentation link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthenticated"),
            ApiError::NotFound { message, .. } => write!(f, "Not found: {}", message),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, docs) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthenticated.".to_string(),
                None,
            ),
            ApiError::NotFound { message, docs } => (StatusCode::NOT_FOUND, message, docs),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { message, docs })).into_response()
    }
}

impl From<TeamAccessError> for ApiError {
    fn from(err: TeamAccessError) -> Self {
        match err {
            TeamAccessError::InvalidToken => ApiError::BadRequest(err.to_string()),
            TeamAccessError::TeamNotFound { ref docs } => ApiError::NotFound {
                docs: docs.clone(),
                message: err.to_string(),
            },
            TeamAccessError::Repository(inner) => ApiError::InternalError(inner.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DatabaseError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized,
        }
    }
}

/// A malformed path parameter, such as a non-integer team ID
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamscope_shared::repository::RepositoryError;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("invalid token".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid token");

        let err = ApiError::NotFound {
            message: "Team not found.".to_string(),
            docs: None,
        };
        assert_eq!(err.to_string(), "Not found: Team not found.");
    }

    #[tokio::test]
    async fn test_invalid_token_maps_to_400() {
        let (status, body) = body_json(TeamAccessError::InvalidToken.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "message": "invalid token" }));
    }

    #[tokio::test]
    async fn test_team_not_found_carries_docs() {
        let err = TeamAccessError::TeamNotFound {
            docs: Some("https://docs.example.com/get-team-by-teamid".to_string()),
        };
        let (status, body) = body_json(err.into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Team not found.",
                "docs": "https://docs.example.com/get-team-by-teamid"
            })
        );

        let (_, body) = body_json(TeamAccessError::TeamNotFound { docs: None }.into()).await;
        assert!(body.get("docs").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = TeamAccessError::Repository(RepositoryError::Storage(
            "password authentication failed".to_string(),
        ));
        let (status, body) = body_json(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_auth_errors() {
        let (status, body) = body_json(AuthError::TokenExpired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthenticated.");

        let (status, _) = body_json(AuthError::DatabaseError("down".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
