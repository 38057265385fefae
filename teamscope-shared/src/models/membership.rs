/// Team membership (the `team_user` join record)
///
/// Implements the many-to-many relationship between users and teams. The
/// join record itself (`pivot`) is internal bookkeeping and is never part of
/// API output.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE team_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE team_user (
///     team_id BIGINT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role team_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamscope_shared::models::membership::TeamMember;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let members = TeamMember::list_by_team(&pool, 1).await?;
/// for member in members {
///     println!("{} ({})", member.user.email, member.pivot.role.as_str());
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::user::User;

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// Created the team, full control
    Owner,

    /// Can manage members and settings
    Admin,

    /// Regular member
    Member,
}

impl TeamRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "owner",
            TeamRole::Admin => "admin",
            TeamRole::Member => "member",
        }
    }
}

/// The `team_user` join record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TeamMembership {
    /// Team ID
    pub team_id: i64,

    /// User ID
    pub user_id: i64,

    /// Role within the team
    pub role: TeamRole,

    /// When the user joined
    pub created_at: DateTime<Utc>,

    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,
}

impl TeamMembership {
    /// Creates an unsaved membership
    pub fn new(team_id: i64, user_id: i64, role: TeamRole) -> Self {
        let now = Utc::now();
        Self {
            team_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user loaded through a team's membership relation, with its join record
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    /// The member's user record
    pub user: User,

    /// Join record linking the user to the team
    pub pivot: TeamMembership,
}

/// Flat row returned by the members query
#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    #[sqlx(flatten)]
    user: User,
    pivot_team_id: i64,
    pivot_user_id: i64,
    pivot_role: TeamRole,
    pivot_created_at: DateTime<Utc>,
    pivot_updated_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            user: row.user,
            pivot: TeamMembership {
                team_id: row.pivot_team_id,
                user_id: row.pivot_user_id,
                role: row.pivot_role,
                created_at: row.pivot_created_at,
                updated_at: row.pivot_updated_at,
            },
        }
    }
}

impl TeamMember {
    /// Lists all members of a team, ordered by user ID
    pub async fn list_by_team(pool: &PgPool, team_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT u.id, u.name, u.email, u.email_verified_at, u.password, u.remember_token,
                   u.two_factor_secret, u.two_factor_recovery_codes, u.two_factor_confirmed_at,
                   u.force_password_reset, u.marketing_emails, u.created_at, u.updated_at,
                   tu.team_id AS pivot_team_id,
                   tu.user_id AS pivot_user_id,
                   tu.role AS pivot_role,
                   tu.created_at AS pivot_created_at,
                   tu.updated_at AS pivot_updated_at
            FROM users u
            INNER JOIN team_user tu ON tu.user_id = u.id
            WHERE tu.team_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(TeamRole::Owner.as_str(), "owner");
        assert_eq!(TeamRole::Admin.as_str(), "admin");
        assert_eq!(TeamRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&TeamRole::Admin).unwrap(), "\"admin\"");
        let role: TeamRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, TeamRole::Owner);
    }

    #[test]
    fn test_new_membership() {
        let membership = TeamMembership::new(1, 2, TeamRole::Member);
        assert_eq!(membership.team_id, 1);
        assert_eq!(membership.user_id, 2);
        assert_eq!(membership.role, TeamRole::Member);
    }
}
