/// Team endpoints
///
/// Read-only views of the caller's teams and their members. All endpoints
/// sit behind the bearer middleware, which supplies the [`Caller`].
///
/// # Endpoints
///
/// - `GET /teams` - Teams the caller belongs to
/// - `GET /teams/:id` - One of the caller's teams
/// - `GET /teams/:id/members` - Members of one of the caller's teams
/// - `GET /teams/current` - The caller's current team
/// - `GET /teams/current/members` - Members of the current team
///
/// Team secrets (`smtp_username`, `smtp_password`, `resend_api_key`,
/// `telegram_token`) are only included for tokens with `view:sensitive`.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension, Json,
};
use teamscope_shared::{
    auth::middleware::Caller,
    projection::{MemberView, TeamView},
};

use crate::{app::AppState, error::ApiResult};

/// List the caller's teams
///
/// # Response
///
/// `200` with an array of teams ordered by ID.
///
/// # Errors
///
/// - `400 {"message": "invalid token"}` when the token has no team
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<TeamView>>> {
    let teams = state.teams.list_teams(&caller).await?;
    Ok(Json(teams))
}

/// Get one of the caller's teams
///
/// # Errors
///
/// - `400` when the ID is not an integer or the token has no team
/// - `404 {"message": "Team not found.", "docs": "..."}` when the caller is
///   not a member of the team, including when it does not exist
pub async fn get_team(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    team_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TeamView>> {
    let Path(team_id) = team_id?;
    let team = state.teams.team_by_id(&caller, team_id).await?;
    Ok(Json(team))
}

/// List the members of one of the caller's teams
pub async fn get_team_members(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    team_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<MemberView>>> {
    let Path(team_id) = team_id?;
    let members = state.teams.team_members(&caller, team_id).await?;
    Ok(Json(members))
}

/// Get the caller's current team
pub async fn current_team(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<TeamView>> {
    Ok(Json(state.teams.current_team(&caller).await?))
}

/// List the members of the caller's current team
pub async fn current_team_members(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<MemberView>>> {
    Ok(Json(state.teams.current_team_members(&caller).await?))
}
