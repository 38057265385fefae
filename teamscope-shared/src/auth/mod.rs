/// Authentication and authorization
///
/// # Modules
///
/// - [`token`]: Token secret generation, hashing and ability matching
/// - [`authenticator`]: Resolving bearer values to callers
/// - [`middleware`]: Axum bearer middleware and the [`middleware::Caller`] type
/// - [`authorization`]: Team scope and sensitive-data checks
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::{generate_secret, verify_secret, has_scope};
///
/// let (secret, hash) = generate_secret();
/// assert!(verify_secret(&secret, &hash));
///
/// let abilities = vec!["read".to_string()];
/// assert!(!has_scope(&abilities, "view:sensitive"));
/// ```

pub mod authenticator;
pub mod authorization;
pub mod middleware;
pub mod token;
