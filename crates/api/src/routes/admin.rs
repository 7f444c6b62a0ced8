//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Role checks are enforced by handler extractors: dashboard and orders
/// admit staff, products and users are admin-only.
///
/// ```text
/// GET  /dashboard                 -> dashboard
/// GET  /orders                    -> list_orders
/// GET  /orders/{id}               -> get_order
/// PUT  /orders/{id}/status        -> update_order_status
/// GET  /products                  -> list_products
/// POST /products                  -> create_product
/// GET  /products/{id}             -> get_product
/// PUT  /products/{id}             -> update_product
/// PUT  /products/{id}/featured    -> set_featured
/// GET  /users                     -> list_users
/// PUT  /users/{id}/role           -> update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", get(admin::get_order))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            get(admin::get_product).put(admin::update_product),
        )
        .route("/products/{id}/featured", put(admin::set_featured))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::update_user_role))
}
