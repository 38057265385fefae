/// Personal access token model and database operations
///
/// Tokens are issued to a user, optionally bound to a team, and carry a list
/// of abilities (e.g. `read`, `view:sensitive`). Only the SHA-256 digest of
/// the secret is stored.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE personal_access_tokens (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id BIGINT REFERENCES teams(id) ON DELETE SET NULL,
///     name VARCHAR(255) NOT NULL,
///     token VARCHAR(64) NOT NULL UNIQUE,
///     abilities TEXT[] NOT NULL DEFAULT '{}',
///     last_used_at TIMESTAMPTZ,
///     expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamscope_shared::models::access_token::{AccessToken, CreateAccessToken};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let (token, bearer) = AccessToken::create(&pool, CreateAccessToken {
///     user_id: 1,
///     team_id: Some(1),
///     name: "ci".to_string(),
///     abilities: vec!["read".to_string()],
///     expires_at: None,
/// }).await?;
///
/// // `bearer` is only available now
/// println!("Token {}: {}", token.id, bearer);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::token::{self, ParsedToken};

/// Personal access token record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AccessToken {
    /// Token ID
    pub id: i64,

    /// Owner of the token
    pub user_id: i64,

    /// Team the token is scoped to (None for tokens issued without a team)
    pub team_id: Option<i64>,

    /// Human-readable name
    pub name: String,

    /// SHA-256 hex digest of the secret
    pub token: String,

    /// Granted abilities
    pub abilities: Vec<String>,

    /// When the token was last used
    pub last_used_at: Option<DateTime<Utc>>,

    /// Optional expiration date
    pub expires_at: Option<DateTime<Utc>>,

    /// When the token was created
    pub created_at: DateTime<Utc>,
}

/// Input for issuing a new token
#[derive(Debug, Clone)]
pub struct CreateAccessToken {
    pub user_id: i64,
    pub team_id: Option<i64>,
    pub name: String,
    pub abilities: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Returns true if `expires_at` is set and in the past
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= Utc::now())
    }

    /// Issues a new token
    ///
    /// Returns the stored record and the `{id}|{secret}` bearer string. The
    /// plaintext secret is not stored and cannot be recovered later.
    pub async fn create(
        pool: &PgPool,
        data: CreateAccessToken,
    ) -> Result<(Self, String), sqlx::Error> {
        let (secret, hash) = token::generate_secret();

        let record = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO personal_access_tokens (user_id, team_id, name, token, abilities, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, team_id, name, token, abilities, last_used_at, expires_at, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.team_id)
        .bind(data.name)
        .bind(hash)
        .bind(&data.abilities)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        let bearer = token::format_bearer_token(record.id, &secret);
        Ok((record, bearer))
    }

    /// Finds the token matching a parsed bearer value
    ///
    /// With an id, the row is fetched by id and the secret compared in
    /// constant time. Without one, the digest itself is the lookup key.
    /// Expiry is not checked here.
    pub async fn find_by_bearer(
        pool: &PgPool,
        parsed: ParsedToken<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let record = match parsed.id {
            Some(id) => sqlx::query_as::<_, AccessToken>(
                r#"
                SELECT id, user_id, team_id, name, token, abilities, last_used_at, expires_at, created_at
                FROM personal_access_tokens
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?
            .filter(|record| token::verify_secret(parsed.secret, &record.token)),
            None => sqlx::query_as::<_, AccessToken>(
                r#"
                SELECT id, user_id, team_id, name, token, abilities, last_used_at, expires_at, created_at
                FROM personal_access_tokens
                WHERE token = $1
                "#,
            )
            .bind(token::hash_secret(parsed.secret))
            .fetch_optional(pool)
            .await?,
        };

        Ok(record)
    }

    /// Records that the token was just used
    pub async fn touch(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE personal_access_tokens SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_with(abilities: &[&str], expires_at: Option<DateTime<Utc>>) -> AccessToken {
        AccessToken {
            id: 1,
            user_id: 1,
            team_id: Some(1),
            name: "test".to_string(),
            token: token::hash_secret("secret"),
            abilities: abilities.iter().map(|a| a.to_string()).collect(),
            last_used_at: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        assert!(!token_with(&[], None).is_expired());
        assert!(!token_with(&[], Some(Utc::now() + Duration::hours(1))).is_expired());
        assert!(token_with(&[], Some(Utc::now() - Duration::seconds(1))).is_expired());
    }
}
