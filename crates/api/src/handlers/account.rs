//! Handlers for the signed-in user's own profile and order history.

use axum::extract::State;
use axum::Json;
use bakery_core::account::{normalize_phone, validate_full_name};
use bakery_core::error::CoreError;
use bakery_db::models::order::Order;
use bakery_db::models::profile::{Profile, UpdateProfile};
use bakery_db::repositories::{OrderRepo, ProfileRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/account/profile
pub async fn get_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        })?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/account/profile
///
/// Omitted fields are left as they are. The phone is stored as digits; the
/// login phone (the identity email) does not change.
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    if let Some(name) = &input.full_name {
        validate_full_name(name)?;
    }
    let update = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        phone: input.phone.as_deref().map(normalize_phone).transpose()?,
        city: input.city.map(|c| c.trim().to_string()),
    };

    let profile = ProfileRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        })?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/account/orders
///
/// The user's orders, newest first.
pub async fn list_orders(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let orders = OrderRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}
