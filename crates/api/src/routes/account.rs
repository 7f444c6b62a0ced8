use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. All require a session.
///
/// ```text
/// GET /profile   -> get_profile
/// PUT /profile   -> update_profile
/// GET /orders    -> list_orders
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .route("/orders", get(account::list_orders))
}
