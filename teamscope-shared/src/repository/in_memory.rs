/// In-memory team repository

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RepositoryError, TeamRepository};
use crate::auth::middleware::Caller;
use crate::models::{
    membership::{TeamMember, TeamMembership, TeamRole},
    team::Team,
    user::User,
};

/// In-memory implementation of [`TeamRepository`]
///
/// Memberships are kept in insertion order so that `list_by_caller` reflects
/// the order teams were joined, not their IDs.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: Arc<RwLock<HashMap<i64, Team>>>,
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    memberships: Arc<RwLock<Vec<TeamMembership>>>,
}

impl InMemoryTeamRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a team
    pub async fn add_team(&self, team: Team) {
        self.teams.write().await.insert(team.id, team);
    }

    /// Inserts or replaces a user
    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Adds a user to a team
    ///
    /// Adding the same pair twice keeps the first membership.
    pub async fn add_member(&self, team_id: i64, user_id: i64, role: TeamRole) {
        let mut memberships = self.memberships.write().await;
        if memberships
            .iter()
            .any(|m| m.team_id == team_id && m.user_id == user_id)
        {
            return;
        }
        memberships.push(TeamMembership::new(team_id, user_id, role));
    }

    async fn is_member(&self, team_id: i64, user_id: i64) -> bool {
        self.memberships
            .read()
            .await
            .iter()
            .any(|m| m.team_id == team_id && m.user_id == user_id)
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn list_by_caller(&self, caller: &Caller) -> Result<Vec<Team>, RepositoryError> {
        let memberships = self.memberships.read().await;
        let teams = self.teams.read().await;

        Ok(memberships
            .iter()
            .filter(|m| m.user_id == caller.user_id)
            .filter_map(|m| teams.get(&m.team_id).cloned())
            .collect())
    }

    async fn find_by_id_for_caller(
        &self,
        caller: &Caller,
        team_id: i64,
    ) -> Result<Option<Team>, RepositoryError> {
        if !self.is_member(team_id, caller.user_id).await {
            return Ok(None);
        }

        Ok(self.teams.read().await.get(&team_id).cloned())
    }

    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError> {
        let memberships = self.memberships.read().await;
        let users = self.users.read().await;

        let mut members: Vec<TeamMember> = memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .filter_map(|m| {
                users.get(&m.user_id).map(|user| TeamMember {
                    user: user.clone(),
                    pivot: m.clone(),
                })
            })
            .collect();
        members.sort_by_key(|member| member.user.id);

        Ok(members)
    }
}
