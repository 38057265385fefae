/// Personal access token utilities
///
/// This module provides the primitives used to issue and check bearer tokens.
/// The database side lives in `models::access_token`.
///
/// # Security
///
/// - **Format**: `{id}|{secret}` where `secret` is 40 random alphanumeric chars
/// - **Storage**: Only the SHA-256 hex digest of the secret is stored
/// - **Validation**: Constant-time comparison against the stored digest
/// - **Abilities**: Scope strings such as `read` or `view:sensitive`
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::{generate_secret, format_bearer_token, parse_bearer_token, verify_secret};
///
/// let (secret, hash) = generate_secret();
/// let bearer = format_bearer_token(7, &secret);
///
/// let parsed = parse_bearer_token(&bearer).unwrap();
/// assert_eq!(parsed.id, Some(7));
/// assert!(verify_secret(parsed.secret, &hash));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random secret part of a token (characters)
pub const TOKEN_SECRET_LENGTH: usize = 40;

/// Separator between the token id and its secret
const TOKEN_ID_SEPARATOR: char = '|';

/// Ability granting every permission
pub const ROOT_ABILITY: &str = "root";

/// A bearer token split into its lookup id and secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedToken<'a> {
    /// Token row id, when the `{id}|{secret}` form was used
    pub id: Option<i64>,

    /// Plaintext secret
    pub secret: &'a str,
}

/// Generates a new token secret
///
/// # Returns
///
/// Tuple of (plaintext_secret, sha256_hex)
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::{generate_secret, TOKEN_SECRET_LENGTH};
///
/// let (secret, hash) = generate_secret();
/// assert_eq!(secret.len(), TOKEN_SECRET_LENGTH);
/// assert_eq!(hash.len(), 64);
/// ```
pub fn generate_secret() -> (String, String) {
    let secret = generate_random_string(TOKEN_SECRET_LENGTH);
    let hash = hash_secret(&secret);

    (secret, hash)
}

/// Generates a random alphanumeric string
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a token secret using SHA-256
///
/// Returns the lowercase hex digest (64 characters).
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builds the `{id}|{secret}` string handed to the token owner
pub fn format_bearer_token(id: i64, secret: &str) -> String {
    format!("{}{}{}", id, TOKEN_ID_SEPARATOR, secret)
}

/// Splits a raw bearer value into id and secret
///
/// Accepts both `{id}|{secret}` and a bare secret. Returns `None` when the
/// value is empty, the id part is not an integer, or the secret is empty.
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::parse_bearer_token;
///
/// let parsed = parse_bearer_token("12|abc").unwrap();
/// assert_eq!(parsed.id, Some(12));
/// assert_eq!(parsed.secret, "abc");
///
/// let bare = parse_bearer_token("abc").unwrap();
/// assert_eq!(bare.id, None);
///
/// assert!(parse_bearer_token("x|abc").is_none());
/// ```
pub fn parse_bearer_token(raw: &str) -> Option<ParsedToken<'_>> {
    let raw = raw.trim();

    match raw.split_once(TOKEN_ID_SEPARATOR) {
        Some((id, secret)) => {
            let id = id.parse::<i64>().ok()?;
            if secret.is_empty() {
                return None;
            }
            Some(ParsedToken {
                id: Some(id),
                secret,
            })
        }
        None if raw.is_empty() => None,
        None => Some(ParsedToken {
            id: None,
            secret: raw,
        }),
    }
}

/// Checks a plaintext secret against a stored digest
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    let computed_hash = hash_secret(secret);
    constant_time_compare(&computed_hash, stored_hash)
}

/// Constant-time string comparison
///
/// Compares the full length of both strings without short-circuiting.
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::constant_time_compare;
///
/// assert!(constant_time_compare("hello", "hello"));
/// assert!(!constant_time_compare("hello", "world"));
/// ```
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Checks if a scope list grants a required ability
///
/// Grants on:
/// - exact match
/// - `*` or `root` (full access)
/// - namespace wildcard, e.g. `view:*` matches `view:sensitive`
///
/// # Example
///
/// ```
/// use teamscope_shared::auth::token::has_scope;
///
/// let scopes = vec!["read".to_string(), "view:*".to_string()];
/// assert!(has_scope(&scopes, "read"));
/// assert!(has_scope(&scopes, "view:sensitive"));
/// assert!(!has_scope(&scopes, "write"));
///
/// assert!(has_scope(&["root".to_string()], "view:sensitive"));
/// ```
pub fn has_scope(scopes: &[String], required: &str) -> bool {
    scopes.iter().any(|scope| {
        if scope == "*" || scope == ROOT_ABILITY || scope == required {
            return true;
        }

        // "view:*" matches "view:sensitive"
        match scope.strip_suffix('*') {
            Some(prefix) if prefix.ends_with(':') => required.starts_with(prefix),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let (secret1, hash1) = generate_secret();
        let (secret2, hash2) = generate_secret();

        assert_eq!(secret1.len(), TOKEN_SECRET_LENGTH);
        assert!(secret1.chars().all(|c| c.is_ascii_alphanumeric()));

        assert_ne!(secret1, secret2);
        assert_ne!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_secret_is_deterministic() {
        let hash = hash_secret("secret");
        assert_eq!(hash, hash_secret("secret"));
        assert_ne!(hash, hash_secret("other"));

        // Known SHA-256 digest of "abc"
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parse_bearer_token() {
        assert_eq!(
            parse_bearer_token("3|s3cret"),
            Some(ParsedToken {
                id: Some(3),
                secret: "s3cret"
            })
        );
        assert_eq!(
            parse_bearer_token("s3cret"),
            Some(ParsedToken {
                id: None,
                secret: "s3cret"
            })
        );

        // Only the first separator splits
        assert_eq!(parse_bearer_token("3|a|b").map(|t| t.secret), Some("a|b"));

        assert!(parse_bearer_token("").is_none());
        assert!(parse_bearer_token("   ").is_none());
        assert!(parse_bearer_token("3|").is_none());
        assert!(parse_bearer_token("abc|secret").is_none());
    }

    #[test]
    fn test_verify_secret() {
        let (secret, hash) = generate_secret();

        assert!(verify_secret(&secret, &hash));
        assert!(!verify_secret("wrong", &hash));
        assert!(!verify_secret("", &hash));
    }

    #[test]
    fn test_format_and_parse() {
        let bearer = format_bearer_token(42, "abc");
        assert_eq!(bearer, "42|abc");

        let parsed = parse_bearer_token(&bearer).unwrap();
        assert_eq!(parsed.id, Some(42));
        assert_eq!(parsed.secret, "abc");
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_has_scope() {
        let scopes = vec!["read".to_string(), "deploy".to_string()];

        assert!(has_scope(&scopes, "read"));
        assert!(has_scope(&scopes, "deploy"));
        assert!(!has_scope(&scopes, "view:sensitive"));
        assert!(!has_scope(&scopes, "write"));
    }

    #[test]
    fn test_has_scope_wildcards() {
        assert!(has_scope(&["*".to_string()], "view:sensitive"));
        assert!(has_scope(&["root".to_string()], "anything"));
        assert!(has_scope(&["view:*".to_string()], "view:sensitive"));
        assert!(!has_scope(&["view:*".to_string()], "read"));

        // A bare trailing star without a namespace is not a wildcard
        assert!(!has_scope(&["view*".to_string()], "view:sensitive"));
    }

    #[test]
    fn test_has_scope_empty() {
        assert!(!has_scope(&[], "read"));
    }
}
