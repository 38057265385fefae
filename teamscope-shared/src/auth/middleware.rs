/// Bearer token middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, resolves it through a
/// [`TokenAuthenticator`], and stores the resulting [`Caller`] in the request
/// extensions. Any failure short-circuits with `401 {"message": "Unauthenticated."}`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{Extension, Router, routing::get, middleware};
/// use teamscope_shared::auth::authenticator::{InMemoryTokenAuthenticator, TokenAuthenticator};
/// use teamscope_shared::auth::middleware::{create_bearer_middleware, Caller};
///
/// async fn whoami(Extension(caller): Extension<Caller>) -> String {
///     format!("user {}", caller.user_id)
/// }
///
/// let authenticator: Arc<dyn TokenAuthenticator> = Arc::new(InMemoryTokenAuthenticator::new());
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_bearer_middleware(authenticator)));
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::authenticator::TokenAuthenticator;
use super::token;
use crate::models::access_token::AccessToken;

/// The authenticated principal of a request
///
/// Built once per request by the middleware and passed explicitly into every
/// team operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Authenticated user ID
    pub user_id: i64,

    /// Team the token is scoped to; this is also the caller's current team
    pub team_id: Option<i64>,

    /// Abilities granted by the token
    pub scopes: Vec<String>,

    /// ID of the token used (None for callers built in-process)
    pub token_id: Option<i64>,
}

impl Caller {
    /// Creates a caller that was not resolved from a stored token
    pub fn new(user_id: i64, team_id: Option<i64>, scopes: Vec<String>) -> Self {
        Self {
            user_id,
            team_id,
            scopes,
            token_id: None,
        }
    }

    /// Creates a caller from a resolved access token
    pub fn from_token(token: &AccessToken) -> Self {
        Self {
            user_id: token.user_id,
            team_id: token.team_id,
            scopes: token.abilities.clone(),
            token_id: Some(token.id),
        }
    }

    /// Checks if the caller's token grants an ability
    pub fn has_scope(&self, required_scope: &str) -> bool {
        token::has_scope(&self.scopes, required_scope)
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a usable bearer value
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token is unknown or its secret does not match
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token lookup failed
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "Token lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
            other => {
                tracing::debug!(reason = %other, "Rejected request");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "Unauthenticated." })),
                )
                    .into_response()
            }
        }
    }
}

/// Reads the bearer value from the Authorization header
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer(req: &Request) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let (scheme, value) = auth_header
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(value)
}

/// Bearer token authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing
/// - The scheme is not Bearer
/// - The token is unknown, mismatched or expired
///
/// Returns 500 if the token store cannot be queried.
pub async fn bearer_auth_middleware(
    authenticator: Arc<dyn TokenAuthenticator>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let bearer = extract_bearer(&req)?.to_owned();
    let caller = authenticator.authenticate(&bearer).await?;

    tracing::debug!(
        user_id = caller.user_id,
        team_id = ?caller.team_id,
        token_id = ?caller.token_id,
        "Authenticated request"
    );

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// Creates a bearer authentication middleware closure
///
/// Captures the authenticator and returns a function usable with
/// `axum::middleware::from_fn`.
pub fn create_bearer_middleware(
    authenticator: Arc<dyn TokenAuthenticator>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    move |req, next| {
        let authenticator = authenticator.clone();
        Box::pin(bearer_auth_middleware(authenticator, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticator::InMemoryTokenAuthenticator;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn request_with(header_value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_caller_from_token() {
        let token = AccessToken {
            id: 9,
            user_id: 4,
            team_id: Some(2),
            name: "ci".to_string(),
            token: token::hash_secret("s"),
            abilities: vec!["read".to_string()],
            last_used_at: None,
            expires_at: None,
            created_at: chrono::Utc::now(),
        };

        let caller = Caller::from_token(&token);
        assert_eq!(caller.user_id, 4);
        assert_eq!(caller.team_id, Some(2));
        assert_eq!(caller.token_id, Some(9));
        assert!(caller.has_scope("read"));
        assert!(!caller.has_scope("view:sensitive"));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&request_with(Some("Bearer 1|abc"))).unwrap(), "1|abc");
        assert_eq!(extract_bearer(&request_with(Some("bearer abc"))).unwrap(), "abc");

        assert!(matches!(
            extract_bearer(&request_with(None)),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            extract_bearer(&request_with(Some("Basic dXNlcjpwYXNz"))),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            extract_bearer(&request_with(Some("Bearer   "))),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_middleware_inserts_caller() {
        let authenticator = Arc::new(InMemoryTokenAuthenticator::new());
        let bearer = authenticator.issue(7, Some(3), &["read"], None);

        async fn whoami(Extension(caller): Extension<Caller>) -> String {
            format!("{}:{:?}", caller.user_id, caller.team_id)
        }

        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn(create_bearer_middleware(authenticator)));

        let response = app
            .clone()
            .oneshot(request_with(Some(&format!("Bearer {}", bearer))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"7:Some(3)");

        let response = app.oneshot(request_with(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
