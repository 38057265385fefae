/// Middleware for the API server
///
/// Authentication lives in `teamscope_shared::auth::middleware`; this module
/// holds HTTP concerns local to the server.

pub mod security;
