//! Credentials and sessions.
//!
//! - [`password`]: Argon2id hashes for phone logins.
//! - [`jwt`]: the signed session token.
//! - [`cookie`]: the HttpOnly `session` cookie carrying that token.

pub mod cookie;
pub mod jwt;
pub mod password;
