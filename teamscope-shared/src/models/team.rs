/// Team model and database operations
///
/// A team groups users (via `team_user`) and owns notification settings,
/// some of which are secrets. This struct is the stored record; it is never
/// serialized directly. API output goes through `projection::TeamView`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     personal_team BOOLEAN NOT NULL DEFAULT FALSE,
///     show_boarding BOOLEAN NOT NULL DEFAULT FALSE,
///     custom_server_limit INTEGER,
///     smtp_enabled BOOLEAN NOT NULL DEFAULT FALSE,
///     smtp_from_address VARCHAR(255),
///     smtp_from_name VARCHAR(255),
///     smtp_recipients TEXT,
///     smtp_host VARCHAR(255),
///     smtp_port INTEGER,
///     smtp_encryption VARCHAR(32),
///     smtp_username TEXT,
///     smtp_password TEXT,
///     smtp_timeout INTEGER,
///     use_instance_email_settings BOOLEAN NOT NULL DEFAULT FALSE,
///     resend_enabled BOOLEAN NOT NULL DEFAULT FALSE,
///     resend_api_key TEXT,
///     telegram_enabled BOOLEAN NOT NULL DEFAULT FALSE,
///     telegram_chat_id VARCHAR(255),
///     telegram_token TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamscope_shared::models::team::Team;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let teams = Team::list_for_user(&pool, 1).await?;
/// for team in teams {
///     println!("{}: {}", team.id, team.name);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Column list shared by every team query
const TEAM_COLUMNS: &str = r#"
    t.id, t.name, t.description, t.personal_team, t.show_boarding, t.custom_server_limit,
    t.smtp_enabled, t.smtp_from_address, t.smtp_from_name, t.smtp_recipients, t.smtp_host,
    t.smtp_port, t.smtp_encryption, t.smtp_username, t.smtp_password, t.smtp_timeout,
    t.use_instance_email_settings, t.resend_enabled, t.resend_api_key,
    t.telegram_enabled, t.telegram_chat_id, t.telegram_token,
    t.created_at, t.updated_at
"#;

/// Team record as stored
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Team {
    /// Team ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Whether this is the owner's personal team
    pub personal_team: bool,

    /// Whether the onboarding flow is still shown
    pub show_boarding: bool,

    /// Per-team server limit override (internal, never exposed)
    pub custom_server_limit: Option<i32>,

    pub smtp_enabled: bool,
    pub smtp_from_address: Option<String>,
    pub smtp_from_name: Option<String>,
    pub smtp_recipients: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_encryption: Option<String>,

    /// SMTP login (secret)
    pub smtp_username: Option<String>,

    /// SMTP password (secret)
    pub smtp_password: Option<String>,

    pub smtp_timeout: Option<i32>,
    pub use_instance_email_settings: bool,

    pub resend_enabled: bool,

    /// Resend API key (secret)
    pub resend_api_key: Option<String>,

    pub telegram_enabled: bool,
    pub telegram_chat_id: Option<String>,

    /// Telegram bot token (secret)
    pub telegram_token: Option<String>,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates an unsaved team with every optional setting empty
    ///
    /// Used for seeding and fixtures; persisted teams come from the database.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: None,
            personal_team: false,
            show_boarding: false,
            custom_server_limit: None,
            smtp_enabled: false,
            smtp_from_address: None,
            smtp_from_name: None,
            smtp_recipients: None,
            smtp_host: None,
            smtp_port: None,
            smtp_encryption: None,
            smtp_username: None,
            smtp_password: None,
            smtp_timeout: None,
            use_instance_email_settings: false,
            resend_enabled: false,
            resend_api_key: None,
            telegram_enabled: false,
            telegram_chat_id: None,
            telegram_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lists every team the user is a member of, ordered by ID
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams t
            INNER JOIN team_user tu ON tu.team_id = t.id
            WHERE tu.user_id = $1
            ORDER BY t.id ASC
            "#
        );

        sqlx::query_as::<_, Team>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Finds a team by ID, but only if the user is a member of it
    ///
    /// Returns `None` both when the team does not exist and when the user
    /// is not a member.
    pub async fn find_for_user(
        pool: &PgPool,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams t
            INNER JOIN team_user tu ON tu.team_id = t.id
            WHERE t.id = $1 AND tu.user_id = $2
            "#
        );

        sqlx::query_as::<_, Team>(&query)
            .bind(team_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
