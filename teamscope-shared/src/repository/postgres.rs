/// PostgreSQL team repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{RepositoryError, TeamRepository};
use crate::auth::middleware::Caller;
use crate::models::{membership::TeamMember, team::Team};

/// Team repository over a PostgreSQL pool
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn list_by_caller(&self, caller: &Caller) -> Result<Vec<Team>, RepositoryError> {
        let teams = Team::list_for_user(&self.pool, caller.user_id).await?;
        debug!(user_id = caller.user_id, count = teams.len(), "Loaded caller teams");
        Ok(teams)
    }

    async fn find_by_id_for_caller(
        &self,
        caller: &Caller,
        team_id: i64,
    ) -> Result<Option<Team>, RepositoryError> {
        Ok(Team::find_for_user(&self.pool, team_id, caller.user_id).await?)
    }

    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError> {
        Ok(TeamMember::list_by_team(&self.pool, team_id).await?)
    }
}
