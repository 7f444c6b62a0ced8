//! Checkout: open a hosted payment session, then turn the paid cart into an
//! order when the shopper comes back.
//!
//! Confirmation relies on the return redirect alone. The order is written
//! only on a success outcome; a second finalize finds an empty cart and is a
//! no-op.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bakery_core::cart::CartView;
use bakery_core::checkout::{CheckoutOutcome, CheckoutSessionRequest, DeliveryDetails, OrderDraft};
use bakery_core::error::CoreError;
use bakery_db::models::order::Order;
use bakery_db::repositories::{CartRepo, OrderRepo};
use bakery_db::stores::PgCartStore;
use bakery_events::{StoreEvent, StoreEventKind};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Request body for `POST /checkout/session`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Page the gateway sends the shopper back to.
    #[serde(alias = "returnUrl")]
    pub return_url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub url: String,
    pub session_id: String,
}

/// Request body for `POST /checkout/finalize`.
#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    #[serde(flatten)]
    pub outcome: CheckoutOutcome,
    /// Delivery form captured before the redirect.
    #[serde(default)]
    pub delivery: DeliveryDetails,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalizeResponse {
    Canceled,
    NothingToFinalize,
    Created {
        order: Order,
        /// Tells the client to drop its stashed delivery form.
        clear_stash: bool,
    },
}

/// POST /api/v1/checkout/session
///
/// Prices are read from the catalog now, never from the client. An empty
/// cart is rejected before the gateway is contacted.
pub async fn create_session(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<Json<CreateSessionResponse>> {
    let store = PgCartStore::new(state.pool.clone());
    let view = CartView::load(&store, user.user_id).await?;

    let request = CheckoutSessionRequest::build(
        user.user_id,
        view.lines(),
        &state.config.checkout_currency,
        &input.return_url,
    )?;

    let session = state
        .payment_gateway
        .create_checkout_session(&request)
        .await
        .map_err(CoreError::from)?;

    tracing::info!(
        user_id = user.user_id,
        session_id = %session.id,
        lines = request.line_items.len(),
        "Checkout session opened"
    );

    Ok(Json(CreateSessionResponse {
        url: session.url,
        session_id: session.id,
    }))
}

/// POST /api/v1/checkout/finalize
///
/// On success, freezes the current cart into a paid, pending order and
/// clears the cart. On cancel, nothing changes.
pub async fn finalize(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<FinalizeRequest>,
) -> AppResult<(StatusCode, Json<FinalizeResponse>)> {
    let session_id = match input.outcome {
        CheckoutOutcome::Canceled => {
            tracing::info!(user_id = user.user_id, "Checkout canceled by shopper");
            return Ok((StatusCode::OK, Json(FinalizeResponse::Canceled)));
        }
        CheckoutOutcome::Success { session_id } => session_id,
    };

    let store = PgCartStore::new(state.pool.clone());
    let view = CartView::load(&store, user.user_id).await?;
    if view.is_empty() {
        tracing::debug!(user_id = user.user_id, "Finalize with empty cart, nothing to do");
        return Ok((StatusCode::OK, Json(FinalizeResponse::NothingToFinalize)));
    }

    let draft = OrderDraft::from_cart(user.user_id, view.lines(), session_id, input.delivery)?;
    let order = OrderRepo::create(&state.pool, &draft)
        .await
        .map_err(AppError::OrderNotCreated)?;

    // The order is committed; a failed clear is only logged.
    match CartRepo::clear(&state.pool, user.user_id).await {
        Ok(removed) => tracing::debug!(user_id = user.user_id, removed, "Cart cleared"),
        Err(e) => {
            tracing::error!(user_id = user.user_id, order_id = order.id, error = %e, "Cart clear failed after order")
        }
    }

    tracing::info!(
        user_id = user.user_id,
        order_id = order.id,
        total = %order.total_price,
        "Order created"
    );
    state.event_bus.publish(StoreEvent::cart_changed(user.user_id));
    state.event_bus.publish(
        StoreEvent::new(StoreEventKind::OrderCreated, user.user_id).with_entity(order.id),
    );

    Ok((
        StatusCode::CREATED,
        Json(FinalizeResponse::Created {
            order,
            clear_stash: true,
        }),
    ))
}
