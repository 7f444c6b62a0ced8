//! Cart row models.

use bakery_core::cart::{CartLine, PersistedLine};
use bakery_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A cart line joined with its product and size.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
    pub id: DbId,
    pub product_id: DbId,
    pub size_id: DbId,
    pub quantity: i32,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub size_label: String,
    pub unit_price: Decimal,
    pub created_at: Timestamp,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            id: row.id,
            product_id: row.product_id,
            size_id: row.size_id,
            quantity: row.quantity,
            product_name: row.product_name,
            product_slug: row.product_slug,
            product_image: row.product_image,
            size_label: row.size_label,
            unit_price: row.unit_price,
            created_at: row.created_at,
        }
    }
}

/// Id and quantity of an existing line.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CartQuantityRow {
    pub id: DbId,
    pub quantity: i32,
}

impl From<CartQuantityRow> for PersistedLine {
    fn from(row: CartQuantityRow) -> Self {
        PersistedLine {
            id: row.id,
            quantity: row.quantity,
        }
    }
}
