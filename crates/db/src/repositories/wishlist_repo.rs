//! Repository for the `wishlist` table.

use bakery_core::types::DbId;
use sqlx::PgPool;

use crate::models::wishlist::WishlistLineRow;

pub struct WishlistRepo;

impl WishlistRepo {
    /// A user's wishlist joined with product display fields, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WishlistLineRow>, sqlx::Error> {
        sqlx::query_as::<_, WishlistLineRow>(
            "SELECT w.id, w.product_id, w.size_id, p.name AS product_name, \
                    p.slug AS product_slug, p.images[1] AS product_image, w.created_at \
             FROM wishlist w \
             JOIN products p ON p.id = w.product_id \
             WHERE w.user_id = $1 \
             ORDER BY w.created_at DESC, w.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a line. Fails with a unique violation on `uq_wishlist_user_product`
    /// if the product is already listed.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        size_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO wishlist (user_id, product_id, size_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(size_id)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Remove a product from a user's wishlist. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
