/// Team access service
///
/// Five read operations over the caller's teams. Each one first resolves the
/// caller's team scope; a token without one fails with
/// [`TeamAccessError::InvalidToken`] before the repository is touched.
/// Teams are passed through the redaction projection before they leave the
/// service, and members lose their join record.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use teamscope_shared::auth::middleware::Caller;
/// use teamscope_shared::models::{membership::TeamRole, team::Team, user::User};
/// use teamscope_shared::repository::InMemoryTeamRepository;
/// use teamscope_shared::service::TeamAccessService;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = Arc::new(InMemoryTeamRepository::new());
/// repo.add_team(Team::new(1, "Platform")).await;
/// repo.add_user(User::new(5, "Ada", "ada@example.com")).await;
/// repo.add_member(1, 5, TeamRole::Owner).await;
///
/// let service = TeamAccessService::new(repo, "https://docs.example.com");
/// let caller = Caller::new(5, Some(1), vec!["read".to_string()]);
///
/// let teams = service.list_teams(&caller).await.unwrap();
/// assert_eq!(teams[0].name, "Platform");
/// # }
/// ```

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::auth::authorization::{require_team_scope, AuthzError};
use crate::auth::middleware::Caller;
use crate::projection::{project_member, redact_team, MemberView, TeamView};
use crate::repository::{RepositoryError, TeamRepository};

/// Docs page linked from a missing team
pub const TEAM_DOCS_PAGE: &str = "get-team-by-teamid";

/// Docs page linked from a missing team's members
pub const TEAM_MEMBERS_DOCS_PAGE: &str = "get-team-by-teamid-members";

/// Error type for team operations
#[derive(Debug, thiserror::Error)]
pub enum TeamAccessError {
    /// The caller's token does not resolve to a team
    #[error("invalid token")]
    InvalidToken,

    /// The team is absent or the caller is not a member of it
    #[error("Team not found.")]
    TeamNotFound {
        /// Documentation link returned alongside the message
        docs: Option<String>,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AuthzError> for TeamAccessError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NoTeamScope => TeamAccessError::InvalidToken,
        }
    }
}

/// Read-only access to the caller's teams
#[derive(Clone)]
pub struct TeamAccessService {
    repository: Arc<dyn TeamRepository>,
    docs_base_url: String,
}

impl TeamAccessService {
    /// Creates a service over `repository`
    ///
    /// `docs_base_url` prefixes the documentation links in not-found errors.
    pub fn new(repository: Arc<dyn TeamRepository>, docs_base_url: impl Into<String>) -> Self {
        Self {
            repository,
            docs_base_url: docs_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn not_found(&self, page: &str) -> TeamAccessError {
        TeamAccessError::TeamNotFound {
            docs: Some(format!("{}/{}", self.docs_base_url, page)),
        }
    }

    /// All teams the caller belongs to, ascending by ID
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn list_teams(&self, caller: &Caller) -> Result<Vec<TeamView>, TeamAccessError> {
        require_team_scope(caller)?;

        let mut teams = self.repository.list_by_caller(caller).await?;
        teams.sort_by_key(|team| team.id);

        debug!(count = teams.len(), "Listing teams");

        Ok(teams
            .iter()
            .map(|team| redact_team(team, &caller.scopes))
            .collect())
    }

    /// One of the caller's teams by ID
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn team_by_id(
        &self,
        caller: &Caller,
        team_id: i64,
    ) -> Result<TeamView, TeamAccessError> {
        require_team_scope(caller)?;

        let team = self
            .repository
            .find_by_id_for_caller(caller, team_id)
            .await?
            .ok_or_else(|| self.not_found(TEAM_DOCS_PAGE))?;

        Ok(redact_team(&team, &caller.scopes))
    }

    /// Members of one of the caller's teams
    ///
    /// Member records are not subject to the sensitive-field policy.
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn team_members(
        &self,
        caller: &Caller,
        team_id: i64,
    ) -> Result<Vec<MemberView>, TeamAccessError> {
        require_team_scope(caller)?;

        let team = self
            .repository
            .find_by_id_for_caller(caller, team_id)
            .await?
            .ok_or_else(|| self.not_found(TEAM_MEMBERS_DOCS_PAGE))?;

        let members = self.repository.members(team.id).await?;
        Ok(members.iter().map(project_member).collect())
    }

    /// The caller's current team
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn current_team(&self, caller: &Caller) -> Result<TeamView, TeamAccessError> {
        require_team_scope(caller)?;

        let team = self
            .repository
            .current_team(caller)
            .await?
            .ok_or(TeamAccessError::TeamNotFound { docs: None })?;

        Ok(redact_team(&team, &caller.scopes))
    }

    /// Members of the caller's current team
    #[instrument(skip(self, caller), fields(user_id = caller.user_id))]
    pub async fn current_team_members(
        &self,
        caller: &Caller,
    ) -> Result<Vec<MemberView>, TeamAccessError> {
        require_team_scope(caller)?;

        let team = self
            .repository
            .current_team(caller)
            .await?
            .ok_or(TeamAccessError::TeamNotFound { docs: None })?;

        let members = self.repository.members(team.id).await?;
        Ok(members.iter().map(project_member).collect())
    }
}
