//! Handlers for the `/auth` resource (signup, login, logout).
//!
//! Shoppers identify with a phone number. The identity record is keyed by a
//! synthetic `{digits}@{domain}` email so phone formatting never matters.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use bakery_core::account::{
    normalize_phone, synthetic_email, validate_full_name, validate_password, INVALID_CREDENTIALS,
    PHONE_TAKEN,
};
use bakery_core::error::CoreError;
use bakery_core::roles::Role;
use bakery_core::types::DbId;
use bakery_db::models::user::CreateUser;
use bakery_db::repositories::{ProfileRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::issue_session_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub phone: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register with full name, phone and password, then sign in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    validate_full_name(&input.full_name)?;
    let phone = normalize_phone(&input.phone)?;
    validate_password(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        email: synthetic_email(&phone, &state.config.email_domain),
        password_hash,
        full_name: input.full_name.trim().to_string(),
        phone,
    };
    let user = UserRepo::create_with_profile(&state.pool, &create)
        .await
        .map_err(|e| {
            if bakery_db::is_unique_violation(&e) {
                AppError::Core(CoreError::Conflict(PHONE_TAKEN.into()))
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(user_id = user.id, "User signed up");

    let (cookie, response) = create_auth_response(&state, user.id, user.email).await?;
    Ok((StatusCode::CREATED, AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with phone + password. Returns the access token and sets the
/// session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let phone = normalize_phone(&input.phone).map_err(|_| invalid())?;
    let email = synthetic_email(&phone, &state.config.email_domain);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let (cookie, response) = create_auth_response(&state, user.id, user.email).await?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

/// POST /api/v1/auth/logout
///
/// Expire the session cookie. Bearer clients simply drop their token.
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token for the user and build the cookie plus response body.
async fn create_auth_response(
    state: &AppState,
    user_id: DbId,
    email: String,
) -> AppResult<(HeaderValue, AuthResponse)> {
    let profile = ProfileRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Profile",
            id: user_id,
        })?;
    let role = profile.role()?;

    let access_token = issue_session_token(user_id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let expires_in = state.config.jwt.expires_in_secs();

    let cookie = session_cookie(&access_token, expires_in)
        .ok_or_else(|| AppError::InternalError("Token is not a valid cookie value".into()))?;

    let response = AuthResponse {
        access_token,
        expires_in,
        user: UserInfo {
            id: user_id,
            email,
            full_name: profile.full_name,
            phone: profile.phone,
            role,
        },
    };
    Ok((cookie, response))
}
