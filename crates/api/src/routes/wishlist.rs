use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wishlist;
use crate::state::AppState;

/// Routes mounted at `/wishlist`. All require a session.
///
/// ```text
/// GET  /         -> get_wishlist
/// POST /toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::get_wishlist))
        .route("/toggle", post(wishlist::toggle))
}
