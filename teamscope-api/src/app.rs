/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use teamscope_api::{app::{build_router, AppState}, config::Config};
/// use teamscope_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.pool_config()).await?;
/// let app = build_router(AppState::from_pool(pool, config));
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use sqlx::PgPool;
use teamscope_shared::{
    auth::{
        authenticator::{PgTokenAuthenticator, TokenAuthenticator},
        middleware::create_bearer_middleware,
    },
    repository::{PgTeamRepository, TeamRepository},
    service::TeamAccessService,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Team operations
    pub teams: TeamAccessService,

    /// Resolves bearer tokens to callers
    pub authenticator: Arc<dyn TokenAuthenticator>,

    /// Database pool, used by the health check (None when running without one)
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state from explicit collaborators
    pub fn new(
        repository: Arc<dyn TeamRepository>,
        authenticator: Arc<dyn TokenAuthenticator>,
        db: Option<PgPool>,
        config: Config,
    ) -> Self {
        Self {
            teams: TeamAccessService::new(repository, config.api.docs_base_url.clone()),
            authenticator,
            db,
            config: Arc::new(config),
        }
    }

    /// Creates state backed by PostgreSQL
    pub fn from_pool(pool: PgPool, config: Config) -> Self {
        Self::new(
            Arc::new(PgTeamRepository::new(pool.clone())),
            Arc::new(PgTokenAuthenticator::new(pool.clone())),
            Some(pool),
            config,
        )
    }
}

/// CORS policy for the configured origins
fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins)
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                         # Health check (public)
/// └── {prefix}/                       # Bearer token required
///     ├── GET /teams
///     ├── GET /teams/current
///     ├── GET /teams/current/members
///     ├── GET /teams/:id
///     └── GET /teams/:id/members
/// ```
///
/// `/teams/current` is a static segment and takes precedence over `/teams/:id`.
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, tracing, then bearer
/// authentication on the team routes only.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let team_routes = Router::new()
        .route("/teams", get(routes::teams::list_teams))
        .route("/teams/current", get(routes::teams::current_team))
        .route(
            "/teams/current/members",
            get(routes::teams::current_team_members),
        )
        .route("/teams/:id", get(routes::teams::get_team))
        .route("/teams/:id/members", get(routes::teams::get_team_members))
        .layer(from_fn(create_bearer_middleware(state.authenticator.clone())));

    let api_routes = if state.config.api.prefix.is_empty() {
        team_routes
    } else {
        Router::new().nest(&state.config.api.prefix, team_routes)
    };

    let cors = cors_layer(&state.config);
    let enable_hsts = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(enable_hsts))
        .with_state(state)
}
