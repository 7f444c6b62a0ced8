use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Phone signup and login, mounted at `/auth`. All public.
///
/// ```text
/// POST /signup   -> signup   (sets the session cookie)
/// POST /login    -> login    (sets the session cookie)
/// POST /logout   -> logout   (expires the session cookie)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}
