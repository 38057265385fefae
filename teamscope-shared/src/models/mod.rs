/// Database models for Teamscope
///
/// Stored records and their SQL. None of these types serialize directly to
/// API output; see `projection` for the response shapes.
///
/// # Models
///
/// - `team`: Teams and their notification settings
/// - `user`: User accounts
/// - `membership`: The `team_user` join record and team roles
/// - `access_token`: Personal access tokens with abilities

pub mod access_token;
pub mod membership;
pub mod team;
pub mod user;
