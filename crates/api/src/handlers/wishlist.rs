//! Handlers for the signed-in user's wishlist.

use axum::extract::State;
use axum::Json;
use bakery_core::error::CoreError;
use bakery_core::types::DbId;
use bakery_core::wishlist::{Toggled, WishlistLine, WishlistView};
use bakery_db::repositories::ProductRepo;
use bakery_db::stores::PgWishlistStore;
use bakery_events::{StoreEvent, StoreEventKind};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /wishlist/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product_id: DbId,
    /// Size the shopper was looking at, if any.
    pub size_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub toggled: Toggled,
    pub lines: Vec<WishlistLine>,
}

/// GET /api/v1/wishlist
pub async fn get_wishlist(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WishlistLine>>>> {
    let store = PgWishlistStore::new(state.pool.clone());
    let view = WishlistView::load(&store, user.user_id).await?;
    Ok(Json(DataResponse {
        data: view.into_lines(),
    }))
}

/// POST /api/v1/wishlist/toggle
///
/// Adds the product when absent and removes it when present.
pub async fn toggle(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ToggleRequest>,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: input.product_id,
        })?;

    let store = PgWishlistStore::new(state.pool.clone());
    let mut view = WishlistView::load(&store, user.user_id).await?;
    let toggled = view.toggle(input.product_id, input.size_id).await?;

    tracing::info!(user_id = user.user_id, product_id = input.product_id, ?toggled, "Wishlist toggled");
    state.event_bus.publish(
        StoreEvent::new(StoreEventKind::WishlistChanged, user.user_id).with_entity(input.product_id),
    );

    Ok(Json(DataResponse {
        data: ToggleResponse {
            toggled,
            lines: view.into_lines(),
        },
    }))
}
