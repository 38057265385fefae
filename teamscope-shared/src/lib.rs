//! # Teamscope Shared Library
//!
//! Domain types and business logic behind the Teamscope team API.
//!
//! ## Module Organization
//!
//! - `auth`: Bearer tokens, the `Caller` principal, and ability checks
//! - `db`: Connection pool and migrations
//! - `models`: Database records for users, teams, memberships and tokens
//! - `projection`: Redacted response shapes for teams and members
//! - `repository`: The `TeamRepository` capability and its implementations
//! - `service`: The team access operations

pub mod auth;
pub mod db;
pub mod models;
pub mod projection;
pub mod repository;
pub mod service;

/// Current version of the Teamscope shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
