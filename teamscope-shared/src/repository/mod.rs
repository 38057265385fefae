/// Team data access
///
/// [`TeamRepository`] is the only capability the team service depends on.
/// Every lookup is bounded by the caller's memberships, so a team the caller
/// does not belong to is indistinguishable from a team that does not exist.
///
/// # Implementations
///
/// - [`postgres::PgTeamRepository`]: backed by the `teams` and `team_user` tables
/// - [`in_memory::InMemoryTeamRepository`]: seeded in-process, used by tests

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use crate::auth::middleware::Caller;
use crate::models::{membership::TeamMember, team::Team};

pub use in_memory::InMemoryTeamRepository;
pub use postgres::PgTeamRepository;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Read access to teams and their members
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Teams the caller is a member of
    ///
    /// No ordering is promised.
    async fn list_by_caller(&self, caller: &Caller) -> Result<Vec<Team>, RepositoryError>;

    /// A team by ID, if the caller is a member of it
    async fn find_by_id_for_caller(
        &self,
        caller: &Caller,
        team_id: i64,
    ) -> Result<Option<Team>, RepositoryError>;

    /// Members of a team, each with its join record
    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError>;

    /// The caller's current team
    ///
    /// The current team is the team the caller's token is scoped to, provided
    /// the caller is still a member of it.
    async fn current_team(&self, caller: &Caller) -> Result<Option<Team>, RepositoryError> {
        match caller.team_id {
            Some(team_id) => self.find_by_id_for_caller(caller, team_id).await,
            None => Ok(None),
        }
    }
}
