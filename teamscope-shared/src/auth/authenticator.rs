/// Token authenticators
///
/// Resolve a raw bearer value into a [`Caller`]. The PostgreSQL
/// implementation backs the server; the in-memory one backs tests and local
/// fixtures.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use super::middleware::{AuthError, Caller};
use super::token;
use crate::models::access_token::AccessToken;

/// Resolves bearer tokens to callers
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Authenticates a raw bearer value (without the `Bearer ` prefix)
    async fn authenticate(&self, bearer: &str) -> Result<Caller, AuthError>;
}

/// Checks expiry and builds the caller for a matched token
fn accept(record: &AccessToken) -> Result<Caller, AuthError> {
    if record.is_expired() {
        return Err(AuthError::TokenExpired);
    }

    Ok(Caller::from_token(record))
}

/// Authenticator backed by the `personal_access_tokens` table
#[derive(Clone)]
pub struct PgTokenAuthenticator {
    pool: PgPool,
}

impl PgTokenAuthenticator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenAuthenticator for PgTokenAuthenticator {
    async fn authenticate(&self, bearer: &str) -> Result<Caller, AuthError> {
        let parsed = token::parse_bearer_token(bearer).ok_or(AuthError::InvalidToken)?;

        let record = AccessToken::find_by_bearer(&self.pool, parsed)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        let caller = accept(&record)?;

        // Usage bookkeeping must not fail the request
        if let Err(e) = AccessToken::touch(&self.pool, record.id).await {
            warn!(token_id = record.id, error = %e, "Failed to update token last_used_at");
        }

        Ok(caller)
    }
}

/// In-memory authenticator
///
/// Stores tokens keyed by id with the same hashing and comparison rules as
/// the database implementation.
pub struct InMemoryTokenAuthenticator {
    tokens: RwLock<HashMap<i64, AccessToken>>,
}

impl InMemoryTokenAuthenticator {
    /// Creates an authenticator with no tokens
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a token and returns its `{id}|{secret}` bearer string
    pub fn issue(
        &self,
        user_id: i64,
        team_id: Option<i64>,
        abilities: &[&str],
        expires_at: Option<DateTime<Utc>>,
    ) -> String {
        let (secret, hash) = token::generate_secret();
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());

        let id = tokens.keys().max().copied().unwrap_or(0) + 1;
        tokens.insert(
            id,
            AccessToken {
                id,
                user_id,
                team_id,
                name: format!("token-{}", id),
                token: hash,
                abilities: abilities.iter().map(|a| a.to_string()).collect(),
                last_used_at: None,
                expires_at,
                created_at: Utc::now(),
            },
        );

        token::format_bearer_token(id, &secret)
    }

    /// Returns a stored token by id
    pub fn get(&self, id: i64) -> Option<AccessToken> {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }
}

impl Default for InMemoryTokenAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenAuthenticator for InMemoryTokenAuthenticator {
    async fn authenticate(&self, bearer: &str) -> Result<Caller, AuthError> {
        let parsed = token::parse_bearer_token(bearer).ok_or(AuthError::InvalidToken)?;

        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::DatabaseError("Failed to acquire lock".to_string()))?;

        let record = match parsed.id {
            Some(id) => tokens
                .get_mut(&id)
                .filter(|record| token::verify_secret(parsed.secret, &record.token)),
            None => {
                let hash = token::hash_secret(parsed.secret);
                tokens
                    .values_mut()
                    .find(|record| token::constant_time_compare(&record.token, &hash))
            }
        }
        .ok_or(AuthError::InvalidToken)?;

        let caller = accept(record)?;
        record.last_used_at = Some(Utc::now());

        Ok(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_issue_and_authenticate() {
        let authenticator = InMemoryTokenAuthenticator::new();
        let bearer = authenticator.issue(1, Some(2), &["read", "view:sensitive"], None);

        let caller = authenticator.authenticate(&bearer).await.unwrap();
        assert_eq!(caller.user_id, 1);
        assert_eq!(caller.team_id, Some(2));
        assert!(caller.has_scope("view:sensitive"));

        let token_id = caller.token_id.unwrap();
        assert!(authenticator.get(token_id).unwrap().last_used_at.is_some());
    }

    #[tokio::test]
    async fn test_bare_secret_is_accepted() {
        let authenticator = InMemoryTokenAuthenticator::new();
        let bearer = authenticator.issue(1, None, &["read"], None);
        let (_, secret) = bearer.split_once('|').unwrap();

        let caller = authenticator.authenticate(secret).await.unwrap();
        assert_eq!(caller.user_id, 1);
        assert_eq!(caller.team_id, None);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let authenticator = InMemoryTokenAuthenticator::new();
        let bearer = authenticator.issue(1, Some(1), &["read"], None);
        let (id, _) = bearer.split_once('|').unwrap();

        let result = authenticator.authenticate(&format!("{}|nope", id)).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));

        let result = authenticator.authenticate("999|whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));

        let result = authenticator.authenticate("abc|whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let authenticator = InMemoryTokenAuthenticator::new();
        let bearer = authenticator.issue(
            1,
            Some(1),
            &["read"],
            Some(Utc::now() - Duration::minutes(5)),
        );

        let result = authenticator.authenticate(&bearer).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_issued_ids_are_sequential() {
        let authenticator = InMemoryTokenAuthenticator::new();
        let first = authenticator.issue(1, None, &[], None);
        let second = authenticator.issue(1, None, &[], None);

        assert!(first.starts_with("1|"));
        assert!(second.starts_with("2|"));
    }
}
