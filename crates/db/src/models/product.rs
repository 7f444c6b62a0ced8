//! Product and product size models.

use bakery_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub tags: Vec<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `product_sizes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductSize {
    pub id: DbId,
    pub product_id: DbId,
    pub size_label: String,
    pub price: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product with its sizes, cheapest first.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithSizes {
    #[serde(flatten)]
    pub product: Product,
    pub sizes: Vec<ProductSize>,
}

/// Outcome of replacing a product's fields and sizes.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub product: ProductWithSizes,
    /// Users whose cart lines for this product went away with the old sizes.
    pub emptied_carts: Vec<DbId>,
}

/// Product fields written by the admin form. Used for both create and update;
/// the slug is only set on create.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_available: bool,
    pub is_featured: bool,
}

/// A size row to insert for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductSize {
    pub size_label: String,
    pub price: Decimal,
}
