//! Public storefront handlers: product listing, detail, occasions, and the
//! page gate.

use axum::extract::{Path, Query, State};
use axum::Json;
use bakery_core::catalog::ProductFilter;
use bakery_core::roles::{check_access, visible_sections, Access, AdminSection, Role};
use bakery_db::models::product::{Product, ProductWithSizes};
use bakery_db::repositories::product_repo::FEATURED_LIMIT;
use bakery_db::repositories::ProductRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::{product_filter, PathParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products?category=&q=&tag=&featured=
pub async fn list_products(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let filter = product_filter(&pairs);
    let products = ProductRepo::list_storefront(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/featured
pub async fn list_featured(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list_featured(&state.pool, FEATURED_LIMIT).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{slug}
///
/// Unavailable products are hidden from the storefront and report 404.
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<ProductWithSizes>>> {
    let product = ProductRepo::find_by_slug_with_sizes(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product '{slug}' not found")))?;
    Ok(Json(DataResponse { data: product }))
}

/// GET /api/v1/occasions/{occasion}
///
/// Products tagged with one occasion. `occasions` lists every occasion.
pub async fn list_occasion(
    State(state): State<AppState>,
    Path(occasion): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let filter = ProductFilter {
        tags: vec![occasion],
        ..ProductFilter::default()
    }
    .normalized();
    let products = ProductRepo::list_storefront(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// Gate decision for one page path.
#[derive(Debug, Serialize)]
pub struct AccessDecision {
    pub path: String,
    pub access: Access,
    /// Where to send the visitor when access is not granted.
    pub redirect: Option<&'static str>,
    pub role: Option<Role>,
    /// Back-office navigation for this role. Empty for shoppers.
    pub sections: Vec<AdminSectionInfo>,
}

#[derive(Debug, Serialize)]
pub struct AdminSectionInfo {
    pub section: AdminSection,
    pub title: &'static str,
    pub path: &'static str,
}

/// GET /api/v1/session/access?path=
///
/// Decide whether the current session (if any) may open a page.
pub async fn session_access(
    MaybeAuthUser(user): MaybeAuthUser,
    Query(params): Query<PathParams>,
) -> Json<DataResponse<AccessDecision>> {
    let role = user.map(|u| u.role);
    let access = check_access(&params.path, role);

    let sections = role
        .map(visible_sections)
        .unwrap_or_default()
        .into_iter()
        .map(|section| AdminSectionInfo {
            section,
            title: section.title(),
            path: section.path(),
        })
        .collect();

    Json(DataResponse {
        data: AccessDecision {
            path: params.path,
            access,
            redirect: access.redirect_path(),
            role,
            sections,
        },
    })
}
