//! Handlers for the signed-in user's cart.
//!
//! Every write goes through a [`CartView`] over the Postgres store, which
//! merges duplicate lines and resyncs from the database when a write fails.
//! A successful write publishes a cart change for the user's open views.

use axum::extract::{Path, State};
use axum::Json;
use bakery_core::cart::{CartLine, CartStore, CartView};
use bakery_core::error::CoreError;
use bakery_core::types::DbId;
use bakery_db::repositories::ProductSizeRepo;
use bakery_db::stores::PgCartStore;
use bakery_events::StoreEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// The cart as returned by every cart endpoint and pushed over the socket.
#[derive(Debug, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Total number of units.
    pub count: i64,
    pub total: Decimal,
}

impl CartSnapshot {
    pub fn from_view<S: CartStore + ?Sized>(view: CartView<'_, S>) -> Self {
        let count = view.count();
        let total = view.total();
        Self {
            lines: view.into_lines(),
            count,
            total,
        }
    }
}

/// Load a fresh snapshot of one user's cart.
pub async fn load_snapshot(state: &AppState, user_id: DbId) -> AppResult<CartSnapshot> {
    let store = PgCartStore::new(state.pool.clone());
    let view = CartView::load(&store, user_id).await?;
    Ok(CartSnapshot::from_view(view))
}

/// Request body for `POST /cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: DbId,
    pub size_id: DbId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Request body for `PUT /cart/items/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// GET /api/v1/cart
pub async fn get_cart(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CartSnapshot>>> {
    let snapshot = load_snapshot(&state, user.user_id).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/cart/items
///
/// Adds to an existing line for the same product and size instead of
/// creating a second one.
pub async fn add_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddItemRequest>,
) -> AppResult<Json<DataResponse<CartSnapshot>>> {
    ProductSizeRepo::find_for_available_product(&state.pool, input.product_id, input.size_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ProductSize",
            id: input.size_id,
        })?;

    let store = PgCartStore::new(state.pool.clone());
    let mut view = CartView::load(&store, user.user_id).await?;
    let outcome = view
        .add_item(input.product_id, input.size_id, input.quantity)
        .await?;

    tracing::info!(
        user_id = user.user_id,
        product_id = input.product_id,
        size_id = input.size_id,
        quantity = input.quantity,
        ?outcome,
        "Cart item added"
    );
    state.event_bus.publish(StoreEvent::cart_changed(user.user_id));

    Ok(Json(DataResponse {
        data: CartSnapshot::from_view(view),
    }))
}

/// PUT /api/v1/cart/items/{id}
///
/// A quantity below 1 removes the line.
pub async fn update_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(line_id): Path<DbId>,
    Json(input): Json<UpdateQuantityRequest>,
) -> AppResult<Json<DataResponse<CartSnapshot>>> {
    let store = PgCartStore::new(state.pool.clone());
    let mut view = CartView::load(&store, user.user_id).await?;
    if !view.lines().iter().any(|l| l.id == line_id) {
        return Err(CoreError::NotFound {
            entity: "CartLine",
            id: line_id,
        }
        .into());
    }

    view.update_quantity(line_id, input.quantity).await?;
    state.event_bus.publish(StoreEvent::cart_changed(user.user_id));

    Ok(Json(DataResponse {
        data: CartSnapshot::from_view(view),
    }))
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(line_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CartSnapshot>>> {
    let store = PgCartStore::new(state.pool.clone());
    let mut view = CartView::load(&store, user.user_id).await?;
    view.remove_item(line_id).await?;
    state.event_bus.publish(StoreEvent::cart_changed(user.user_id));

    Ok(Json(DataResponse {
        data: CartSnapshot::from_view(view),
    }))
}
