//! Back-office handlers.
//!
//! Dashboard and Orders admit staff and admin ([`RequireStaff`]); Products
//! and Users are admin-only ([`RequireAdmin`]).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bakery_core::catalog::{parse_tags_input, slugify, validate_product, SizeInput};
use bakery_core::error::CoreError;
use bakery_core::orders::validate_transition;
use bakery_core::types::DbId;
use bakery_db::models::dashboard::DashboardStats;
use bakery_db::models::order::{AdminOrder, Order, UpdateOrderStatus};
use bakery_db::models::product::{CreateProductSize, Product, ProductInput, ProductWithSizes};
use bakery_db::models::profile::{Profile, ProfileWithEmail, UpdateRole};
use bakery_db::repositories::{DashboardRepo, OrderRepo, ProductRepo, ProfileRepo};
use bakery_events::{StoreEvent, StoreEventKind};
use rand::Rng;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dashboard
///
/// The four figures are independent queries run concurrently.
pub async fn dashboard(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let (products, orders, revenue, users) = tokio::try_join!(
        DashboardRepo::count_products(&state.pool),
        DashboardRepo::count_orders(&state.pool),
        DashboardRepo::paid_revenue(&state.pool),
        DashboardRepo::count_users(&state.pool),
    )?;

    Ok(Json(DataResponse {
        data: DashboardStats::new(products, orders, revenue, users),
    }))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders
pub async fn list_orders(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AdminOrder>>>> {
    let orders = OrderRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/admin/orders/{id}
pub async fn get_order(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminOrder>>> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/admin/orders/{id}/status
///
/// One step forward along pending → processing → shipped → delivered, or
/// cancel from any state that is not already cancelled.
pub async fn update_order_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<Json<DataResponse<Order>>> {
    let current = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;
    let from = current.order.status()?;
    validate_transition(from, input.status)?;

    let order = OrderRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    tracing::info!(
        order_id = id,
        from = %from,
        to = %input.status,
        changed_by = user.user_id,
        "Order status updated"
    );
    state.event_bus.publish(
        StoreEvent::new(StoreEventKind::OrderStatusChanged, order.user_id).with_entity(order.id),
    );

    Ok(Json(DataResponse { data: order }))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Tags arrive either as a list or as the form's comma-separated text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Text(String),
}

impl Default for TagsField {
    fn default() -> Self {
        TagsField::List(Vec::new())
    }
}

impl TagsField {
    fn into_tags(self) -> Vec<String> {
        match self {
            TagsField::List(tags) => tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            TagsField::Text(text) => parse_tags_input(&text),
        }
    }
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    pub tags: TagsField,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub sizes: Vec<SizeInput>,
}

fn default_available() -> bool {
    true
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProductForm {
    /// Validate and split into the product row and its size rows.
    fn into_parts(self) -> Result<(ProductInput, Vec<CreateProductSize>), CoreError> {
        validate_product(&self.name, &self.category, &self.sizes)?;

        let sizes = self
            .sizes
            .into_iter()
            .map(|s| CreateProductSize {
                size_label: s.size_label,
                price: s.price,
            })
            .collect();
        let input = ProductInput {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            category: self.category.trim().to_string(),
            images: self
                .images
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
            video: non_blank(self.video),
            tags: self.tags.into_tags(),
            is_available: self.is_available,
            is_featured: self.is_featured,
        };
        Ok((input, sizes))
    }
}

/// Request body for `PUT /admin/products/{id}/featured`.
#[derive(Debug, Deserialize)]
pub struct FeaturedRequest {
    pub is_featured: bool,
}

/// GET /api/v1/admin/products
///
/// Every product, including unavailable ones.
pub async fn list_products(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/admin/products/{id}
pub async fn get_product(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductWithSizes>>> {
    let product = ProductRepo::find_by_id_with_sizes(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/admin/products
///
/// The slug is the lowercased, hyphenated name plus a random suffix.
pub async fn create_product(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductWithSizes>>)> {
    let (input, sizes) = form.into_parts()?;
    let slug = slugify(&input.name, rand::rng().random_range(0..1000u32));

    let product = ProductRepo::create(&state.pool, &slug, &input, &sizes).await?;

    tracing::info!(
        product_id = product.product.id,
        slug = %product.product.slug,
        sizes = product.sizes.len(),
        created_by = user.user_id,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/admin/products/{id}
///
/// Overwrites every field and replaces all sizes. The slug never changes.
pub async fn update_product(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<ProductForm>,
) -> AppResult<Json<DataResponse<ProductWithSizes>>> {
    let (input, sizes) = form.into_parts()?;

    let update = ProductRepo::update(&state.pool, id, &input, &sizes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    for user_id in &update.emptied_carts {
        state.event_bus.publish(StoreEvent::cart_changed(*user_id));
    }

    tracing::info!(
        product_id = id,
        updated_by = user.user_id,
        emptied_carts = update.emptied_carts.len(),
        "Product updated"
    );
    Ok(Json(DataResponse { data: update.product }))
}

/// PUT /api/v1/admin/products/{id}/featured
pub async fn set_featured(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FeaturedRequest>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::set_featured(&state.pool, id, input.is_featured)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(DataResponse { data: product }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProfileWithEmail>>>> {
    let users = ProfileRepo::list_with_email(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Takes effect on the user's next request.
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::update_role(&state.pool, id, input.role)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Profile",
            id,
        })?;

    tracing::info!(user_id = id, role = %input.role, changed_by = admin.user_id, "User role updated");
    Ok(Json(DataResponse { data: profile }))
}
