//! Wishlist row model.

use bakery_core::types::{DbId, Timestamp};
use bakery_core::wishlist::WishlistLine;
use sqlx::FromRow;

/// A wishlist line joined with product display fields.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistLineRow {
    pub id: DbId,
    pub product_id: DbId,
    pub size_id: Option<DbId>,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub created_at: Timestamp,
}

impl From<WishlistLineRow> for WishlistLine {
    fn from(row: WishlistLineRow) -> Self {
        WishlistLine {
            id: row.id,
            product_id: row.product_id,
            size_id: row.size_id,
            product_name: row.product_name,
            product_slug: row.product_slug,
            product_image: row.product_image,
            created_at: row.created_at,
        }
    }
}
