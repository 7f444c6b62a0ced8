pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod wishlist;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/cart                                   cart feed WebSocket (auth required)
///
/// /auth/signup                               signup (public)
/// /auth/login                                login (public)
/// /auth/logout                               logout (public, clears cookie)
///
/// /products                                  storefront listing (public)
/// /products/featured                         home page picks (public)
/// /products/{slug}                           product detail (public)
/// /occasions/{occasion}                      occasion listing (public)
/// /session/access                            page gate decision (public)
///
/// /cart                                      get (auth required)
/// /cart/items                                add (POST)
/// /cart/items/{id}                           update quantity, remove (PUT, DELETE)
///
/// /wishlist                                  get (auth required)
/// /wishlist/toggle                           toggle (POST)
///
/// /account/profile                           get, update (auth required)
/// /account/orders                            order history (auth required)
///
/// /checkout/session                          open hosted session (POST)
/// /checkout/finalize                         record the return outcome (POST)
///
/// /admin/dashboard                           figures (staff or admin)
/// /admin/orders                              list (staff or admin)
/// /admin/orders/{id}                         get (staff or admin)
/// /admin/orders/{id}/status                  update status (PUT)
/// /admin/products                            list, create (admin only)
/// /admin/products/{id}                       get, update (admin only)
/// /admin/products/{id}/featured              set featured flag (PUT)
/// /admin/users                               list (admin only)
/// /admin/users/{id}/role                     change role (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Cart feed.
        .route("/ws/cart", get(ws::cart_ws_handler))
        // Authentication.
        .nest("/auth", auth::router())
        // Storefront catalog and page gate.
        .merge(catalog::router())
        // Shopper-owned resources.
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/account", account::router())
        .nest("/checkout", checkout::router())
        // Back office.
        .nest("/admin", admin::router())
}
