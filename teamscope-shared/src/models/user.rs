/// User model
///
/// Users belong to teams through `team_user` (see `models::membership`).
/// Credential material lives on this record but is never part of API output;
/// members are rendered through `projection::MemberView`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     email_verified_at TIMESTAMPTZ,
///     password VARCHAR(255) NOT NULL,
///     remember_token VARCHAR(100),
///     two_factor_secret TEXT,
///     two_factor_recovery_codes TEXT,
///     two_factor_confirmed_at TIMESTAMPTZ,
///     force_password_reset BOOLEAN NOT NULL DEFAULT FALSE,
///     marketing_emails BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};

/// User account record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    /// User ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address (unique)
    pub email: String,

    /// When the email was verified
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Password hash
    pub password: String,

    /// Session "remember me" token
    pub remember_token: Option<String>,

    /// Encrypted TOTP secret
    pub two_factor_secret: Option<String>,

    /// Encrypted recovery codes
    pub two_factor_recovery_codes: Option<String>,

    /// When two-factor auth was confirmed
    pub two_factor_confirmed_at: Option<DateTime<Utc>>,

    /// Whether the user must change their password on next login
    pub force_password_reset: bool,

    /// Marketing email opt-in
    pub marketing_emails: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an unsaved user with empty credentials
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            email: email.into(),
            email_verified_at: None,
            password: String::new(),
            remember_token: None,
            two_factor_secret: None,
            two_factor_recovery_codes: None,
            two_factor_confirmed_at: None,
            force_password_reset: false,
            marketing_emails: true,
            created_at: now,
            updated_at: now,
        }
    }
}
