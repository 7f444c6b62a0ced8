use axum::routing::post;
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Routes mounted at `/checkout`. All require a session.
///
/// ```text
/// POST /session    -> create_session
/// POST /finalize   -> finalize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(checkout::create_session))
        .route("/finalize", post(checkout::finalize))
}
