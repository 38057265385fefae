/// Response projections for teams and members
///
/// Stored records are never serialized directly. Each response is built by a
/// pure function from a record plus the caller's abilities, so nothing on the
/// record is mutated to hide fields.
///
/// # Visibility rules
///
/// | Field | Output |
/// |---|---|
/// | `custom_server_limit` | never |
/// | membership `pivot` | never |
/// | `smtp_username`, `smtp_password`, `resend_api_key`, `telegram_token` | only with `view:sensitive` |
/// | user `password`, `remember_token`, two-factor secrets | never |
///
/// # Key order
///
/// Struct field order is the JSON key order: `id`, `description`, `name`
/// first, the remaining keys alphabetically, then `created_at` and
/// `updated_at`.
///
/// # Example
///
/// ```
/// use teamscope_shared::models::team::Team;
/// use teamscope_shared::projection::redact_team;
///
/// let mut team = Team::new(1, "Platform");
/// team.smtp_password = Some("x".to_string());
///
/// let view = redact_team(&team, &["read".to_string()]);
/// let json = serde_json::to_value(&view).unwrap();
/// assert!(json.get("smtp_password").is_none());
///
/// let view = redact_team(&team, &["view:sensitive".to_string()]);
/// let json = serde_json::to_value(&view).unwrap();
/// assert_eq!(json["smtp_password"], "x");
/// ```

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::auth::{authorization::VIEW_SENSITIVE, token};
use crate::models::{membership::TeamMember, team::Team, user::User};

/// A field that is either shown or left out of the output entirely
///
/// Used with `#[serde(skip_serializing_if = "Sensitive::is_withheld")]` so a
/// withheld field produces no key, while a revealed `None` still produces
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sensitive<T> {
    Revealed(T),
    Withheld,
}

impl<T> Sensitive<T> {
    /// Reveals `value` only when `allowed` is true
    pub fn reveal_if(allowed: bool, value: T) -> Self {
        if allowed {
            Sensitive::Revealed(value)
        } else {
            Sensitive::Withheld
        }
    }

    pub fn is_withheld(&self) -> bool {
        matches!(self, Sensitive::Withheld)
    }

    /// The revealed value, if any
    pub fn revealed(&self) -> Option<&T> {
        match self {
            Sensitive::Revealed(value) => Some(value),
            Sensitive::Withheld => None,
        }
    }
}

impl<T: Serialize> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Sensitive::Revealed(value) => value.serialize(serializer),
            Sensitive::Withheld => serializer.serialize_none(),
        }
    }
}

/// Team as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    pub id: i64,
    pub description: Option<String>,
    pub name: String,
    pub personal_team: bool,
    #[serde(skip_serializing_if = "Sensitive::is_withheld")]
    pub resend_api_key: Sensitive<Option<String>>,
    pub resend_enabled: bool,
    pub show_boarding: bool,
    pub smtp_enabled: bool,
    pub smtp_encryption: Option<String>,
    pub smtp_from_address: Option<String>,
    pub smtp_from_name: Option<String>,
    pub smtp_host: Option<String>,
    #[serde(skip_serializing_if = "Sensitive::is_withheld")]
    pub smtp_password: Sensitive<Option<String>>,
    pub smtp_port: Option<i32>,
    pub smtp_recipients: Option<String>,
    pub smtp_timeout: Option<i32>,
    #[serde(skip_serializing_if = "Sensitive::is_withheld")]
    pub smtp_username: Sensitive<Option<String>>,
    pub telegram_chat_id: Option<String>,
    pub telegram_enabled: bool,
    #[serde(skip_serializing_if = "Sensitive::is_withheld")]
    pub telegram_token: Sensitive<Option<String>>,
    pub use_instance_email_settings: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamView {
    /// Projects a team, revealing secrets only when `reveal_sensitive` is set
    ///
    /// `custom_server_limit` has no counterpart here and is always dropped.
    pub fn project(team: &Team, reveal_sensitive: bool) -> Self {
        let secret = |value: &Option<String>| Sensitive::reveal_if(reveal_sensitive, value.clone());

        Self {
            id: team.id,
            description: team.description.clone(),
            name: team.name.clone(),
            personal_team: team.personal_team,
            resend_api_key: secret(&team.resend_api_key),
            resend_enabled: team.resend_enabled,
            show_boarding: team.show_boarding,
            smtp_enabled: team.smtp_enabled,
            smtp_encryption: team.smtp_encryption.clone(),
            smtp_from_address: team.smtp_from_address.clone(),
            smtp_from_name: team.smtp_from_name.clone(),
            smtp_host: team.smtp_host.clone(),
            smtp_password: secret(&team.smtp_password),
            smtp_port: team.smtp_port,
            smtp_recipients: team.smtp_recipients.clone(),
            smtp_timeout: team.smtp_timeout,
            smtp_username: secret(&team.smtp_username),
            telegram_chat_id: team.telegram_chat_id.clone(),
            telegram_enabled: team.telegram_enabled,
            telegram_token: secret(&team.telegram_token),
            use_instance_email_settings: team.use_instance_email_settings,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Applies the team redaction policy for a set of granted abilities
pub fn redact_team(team: &Team, granted_scopes: &[String]) -> TeamView {
    TeamView::project(team, token::has_scope(granted_scopes, VIEW_SENSITIVE))
}

/// Team member as returned by the API
///
/// Built from the user record alone; the membership pivot is dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub force_password_reset: bool,
    pub marketing_emails: bool,
    pub two_factor_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for MemberView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified_at: user.email_verified_at,
            force_password_reset: user.force_password_reset,
            marketing_emails: user.marketing_emails,
            two_factor_confirmed_at: user.two_factor_confirmed_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Projects a member, dropping its join record
pub fn project_member(member: &TeamMember) -> MemberView {
    MemberView::from(&member.user)
}
