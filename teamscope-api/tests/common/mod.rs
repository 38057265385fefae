//! Shared fixtures for router tests
//!
//! Builds the full router over in-memory collaborators, so no database is
//! needed. The seeded world:
//!
//! - users 1 (Ada), 2 (Linus), 3 (Grace)
//! - teams 3, 1, 2 joined by Ada in that order, each with SMTP and chat secrets
//! - team 1 also has Linus; team 4 belongs to Grace alone

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use teamscope_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamscope_shared::{
    auth::authenticator::InMemoryTokenAuthenticator,
    models::{membership::TeamRole, team::Team, user::User},
    repository::InMemoryTeamRepository,
};
use tower::ServiceExt;

pub const DOCS_BASE_URL: &str = "https://docs.example.com/api";

pub const ADA: i64 = 1;
pub const LINUS: i64 = 2;
pub const GRACE: i64 = 3;
pub const FOREIGN_TEAM: i64 = 4;

/// Test context containing the router and its fixtures
pub struct TestContext {
    pub app: Router,
    pub repository: Arc<InMemoryTeamRepository>,
    pub authenticator: Arc<InMemoryTokenAuthenticator>,
}

fn seeded_team(id: i64) -> Team {
    let mut team = Team::new(id, format!("Team {}", id));
    team.description = Some(format!("Description {}", id));
    team.custom_server_limit = Some(10);
    team.smtp_enabled = true;
    team.smtp_host = Some("smtp.example.com".to_string());
    team.smtp_port = Some(587);
    team.smtp_username = Some("mailer".to_string());
    team.smtp_password = Some("x".to_string());
    team.resend_api_key = Some("re_secret".to_string());
    team.telegram_chat_id = Some("-100".to_string());
    team.telegram_token = Some("bot:secret".to_string());
    team
}

fn test_config(prefix: &str) -> Config {
    Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some("postgresql://unused/teamscope_test".to_string()),
        "DOCS_BASE_URL" => Some(DOCS_BASE_URL.to_string()),
        "API_PREFIX" => Some(prefix.to_string()),
        _ => None,
    })
    .unwrap()
}

impl TestContext {
    /// Creates a context with the routes under `/api/v1`
    pub async fn new() -> Self {
        Self::with_prefix("/api/v1").await
    }

    pub async fn with_prefix(prefix: &str) -> Self {
        let repository = Arc::new(InMemoryTeamRepository::new());
        let authenticator = Arc::new(InMemoryTokenAuthenticator::new());

        repository.add_user(User::new(ADA, "Ada", "ada@example.com")).await;
        repository.add_user(User::new(LINUS, "Linus", "linus@example.com")).await;
        repository.add_user(User::new(GRACE, "Grace", "grace@example.com")).await;

        for id in [3, 1, 2] {
            repository.add_team(seeded_team(id)).await;
            repository.add_member(id, ADA, TeamRole::Member).await;
        }
        repository.add_member(1, LINUS, TeamRole::Admin).await;

        repository.add_team(seeded_team(FOREIGN_TEAM)).await;
        repository.add_member(FOREIGN_TEAM, GRACE, TeamRole::Owner).await;

        let state = AppState::new(
            repository.clone(),
            authenticator.clone(),
            None,
            test_config(prefix),
        );

        Self {
            app: build_router(state),
            repository,
            authenticator,
        }
    }

    /// Token for Ada scoped to `team_id`
    pub fn token(&self, team_id: Option<i64>, abilities: &[&str]) -> String {
        self.authenticator.issue(ADA, team_id, abilities, None)
    }

    /// Ada's read-only token for team 1
    pub fn reader(&self) -> String {
        self.token(Some(1), &["read"])
    }

    /// Ada's token for team 1 that may see secrets
    pub fn sensitive_reader(&self) -> String {
        self.token(Some(1), &["read", "view:sensitive"])
    }

    pub fn expired_token(&self) -> String {
        self.authenticator
            .issue(ADA, Some(1), &["read"], Some(Utc::now() - Duration::hours(1)))
    }

    /// Sends a GET request and parses the JSON body
    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&body))
            })
        };

        (status, json)
    }
}

/// IDs of a JSON array of objects
pub fn ids(value: &serde_json::Value) -> Vec<i64> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item["id"].as_i64().expect("expected an integer id"))
        .collect()
}
