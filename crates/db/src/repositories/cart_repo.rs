//! Repository for the `cart` table.
//!
//! Every query is scoped by `user_id`; a line id alone never identifies a row.

use bakery_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart::{CartLineRow, CartQuantityRow};

/// Join used by every read that returns display-ready lines.
const JOINED_SELECT: &str = "SELECT c.id, c.product_id, c.size_id, c.quantity, \
        p.name AS product_name, p.slug AS product_slug, p.images[1] AS product_image, \
        s.size_label, s.price AS unit_price, c.created_at \
     FROM cart c \
     JOIN products p ON p.id = c.product_id \
     JOIN product_sizes s ON s.id = c.size_id";

pub struct CartRepo;

impl CartRepo {
    /// All lines for a user joined with current product and size data, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CartLineRow>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} WHERE c.user_id = $1 ORDER BY c.created_at DESC, c.id DESC");
        sqlx::query_as::<_, CartLineRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The existing line for a (user, product, size) triple, if any.
    pub async fn find_line(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
    ) -> Result<Option<CartQuantityRow>, sqlx::Error> {
        sqlx::query_as::<_, CartQuantityRow>(
            "SELECT id, quantity FROM cart WHERE user_id = $1 AND product_id = $2 AND size_id = $3",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(size_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a line. Fails with a unique violation on
    /// `uq_cart_user_product_size` if the triple already exists.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
        quantity: i32,
    ) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO cart (user_id, product_id, size_id, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(size_id)
        .bind(quantity)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Replace a line's quantity. Returns `true` if the row was updated.
    pub async fn set_quantity(
        pool: &PgPool,
        user_id: DbId,
        line_id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE cart SET quantity = $3 WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .bind(quantity)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one line. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, line_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every line for a user. Returns the number of rows removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
