//! Session tokens.
//!
//! A successful signup or login issues one HS256 JWT. It travels in the
//! `session` cookie (or an `Authorization: Bearer` header for API clients)
//! and is the whole session: there is no refresh flow and no server-side
//! session row.

use bakery_core::roles::Role;
use bakery_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Role when the token was issued. Requests re-read the profile, so a
    /// role change applies before the token expires.
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Session lifetime when `SESSION_TTL_MINS` is unset: one day.
const DEFAULT_SESSION_TTL_MINS: i64 = 24 * 60;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for signing and verifying.
    pub secret: String,
    pub session_ttl_mins: i64,
}

impl JwtConfig {
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `SESSION_TTL_MINS` | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics on a missing or empty `JWT_SECRET` or a non-numeric TTL.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_ttl_mins = std::env::var("SESSION_TTL_MINS")
            .ok()
            .map(|v| v.parse().expect("SESSION_TTL_MINS must be a whole number of minutes"))
            .unwrap_or(DEFAULT_SESSION_TTL_MINS);

        Self {
            secret,
            session_ttl_mins,
        }
    }

    /// Session lifetime in seconds; also the cookie `Max-Age`.
    pub fn expires_in_secs(&self) -> i64 {
        self.session_ttl_mins * 60
    }

    fn validation() -> Validation {
        Validation::new(Algorithm::HS256)
    }
}

/// Sign a session token for `user_id`.
pub fn issue_session_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        exp: iat + config.expires_in_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the claims.
pub fn decode_session_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}
