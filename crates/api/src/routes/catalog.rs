//! Route definitions for the public storefront.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET /products               -> list_products
/// GET /products/featured      -> list_featured
/// GET /products/{slug}        -> get_product
/// GET /occasions/{occasion}   -> list_occasion
/// GET /session/access         -> session_access
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/featured", get(catalog::list_featured))
        .route("/products/{slug}", get(catalog::get_product))
        .route("/occasions/{occasion}", get(catalog::list_occasion))
        .route("/session/access", get(catalog::session_access))
}
