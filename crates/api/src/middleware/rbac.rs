//! Back-office gate extractors.
//!
//! Admission follows [`AdminSection::allows`], the same table the page gate
//! uses, so an API route and its back-office page never disagree.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bakery_core::error::CoreError;
use bakery_core::roles::AdminSection;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the session, then reject with 403 unless its role may open `section`.
async fn admit(
    parts: &mut Parts,
    state: &AppState,
    section: AdminSection,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !section.allows(user.role) {
        tracing::debug!(user_id = user.user_id, role = %user.role, ?section, "Back-office access denied");
        return Err(CoreError::Forbidden(format!(
            "The {} section is not available to the {} role",
            section.title(),
            user.role
        ))
        .into());
    }
    Ok(user)
}

/// Admin only: products and users.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        admit(parts, state, AdminSection::Products).await.map(RequireAdmin)
    }
}

/// Staff or admin: dashboard and orders.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        admit(parts, state, AdminSection::Orders).await.map(RequireStaff)
    }
}

/// Any signed-in shopper. Used by the cart, wishlist, account and checkout
/// routes.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state).await.map(RequireAuth)
    }
}
