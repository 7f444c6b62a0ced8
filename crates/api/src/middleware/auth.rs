//! Request-scoped identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bakery_core::error::CoreError;
use bakery_core::roles::Role;
use bakery_core::types::DbId;
use bakery_db::repositories::ProfileRepo;

use crate::auth::cookie::{read_cookie, SESSION_COOKIE};
use crate::auth::jwt::decode_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in user for this request.
///
/// The token is taken from `Authorization: Bearer <token>` or, failing that,
/// the `session` cookie. The role is read from the profile on every request
/// so role changes apply without a new login.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

/// Pull the raw token from the request, if any.
fn bearer_or_cookie(parts: &Parts) -> Result<Option<&str>, AppError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let header = header.to_str().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization header".into(),
            ))
        })?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;
        return Ok(Some(token));
    }
    Ok(read_cookie(&parts.headers, SESSION_COOKIE))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not signed in".into()))
        })?;

        let claims = decode_session_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = ProfileRepo::find_role(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
            })?;
        let role: Role = role
            .parse()
            .map_err(|e: CoreError| AppError::InternalError(e.to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}

/// Optional identity for public endpoints that adapt to a session.
///
/// Missing, malformed, or expired credentials all yield `None`.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Core(CoreError::Unauthorized(_))) => Ok(MaybeAuthUser(None)),
            Err(e) => Err(e),
        }
    }
}
