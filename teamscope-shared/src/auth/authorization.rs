/// Authorization helpers
///
/// Two checks gate the team endpoints:
///
/// 1. **Team scope**: the caller's token must resolve to a team. Tokens
///    issued without one are rejected with "invalid token".
/// 2. **Sensitive data**: secrets on a team are only revealed to tokens that
///    grant [`VIEW_SENSITIVE`].

use super::middleware::Caller;

/// Ability that reveals team secrets
pub const VIEW_SENSITIVE: &str = "view:sensitive";

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// The token does not resolve to a team
    #[error("invalid token")]
    NoTeamScope,
}

/// Returns the team the caller's token is scoped to
///
/// # Errors
///
/// Returns `AuthzError::NoTeamScope` if the token carries no team.
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::authorization::require_team_scope;
/// use teamscope_shared::auth::middleware::Caller;
///
/// let caller = Caller::new(1, Some(5), vec![]);
/// assert_eq!(require_team_scope(&caller), Ok(5));
///
/// let unscoped = Caller::new(1, None, vec![]);
/// assert!(require_team_scope(&unscoped).is_err());
/// ```
pub fn require_team_scope(caller: &Caller) -> Result<i64, AuthzError> {
    caller.team_id.ok_or(AuthzError::NoTeamScope)
}

/// Whether team secrets may be shown to this caller
pub fn can_view_sensitive(caller: &Caller) -> bool {
    caller.has_scope(VIEW_SENSITIVE)
}
