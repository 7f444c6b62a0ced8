//! Repository for the `product_sizes` table.

use bakery_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::product::{CreateProductSize, ProductSize};

const COLUMNS: &str = "id, product_id, size_label, price, created_at, updated_at";

pub struct ProductSizeRepo;

impl ProductSizeRepo {
    /// Sizes of one product, cheapest first.
    pub async fn list_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductSize>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_sizes WHERE product_id = $1 ORDER BY price ASC, id ASC"
        );
        sqlx::query_as::<_, ProductSize>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Find a size that belongs to the given available product.
    pub async fn find_for_available_product(
        pool: &PgPool,
        product_id: DbId,
        size_id: DbId,
    ) -> Result<Option<ProductSize>, sqlx::Error> {
        sqlx::query_as::<_, ProductSize>(
            "SELECT s.id, s.product_id, s.size_label, s.price, s.created_at, s.updated_at
             FROM product_sizes s
             JOIN products p ON p.id = s.product_id
             WHERE s.id = $1 AND s.product_id = $2 AND p.is_available = TRUE",
        )
        .bind(size_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert sizes for a product inside an open transaction.
    pub async fn insert_many(
        tx: &mut Transaction<'_, Postgres>,
        product_id: DbId,
        sizes: &[CreateProductSize],
    ) -> Result<Vec<ProductSize>, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_sizes (product_id, size_label, price)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let mut inserted = Vec::with_capacity(sizes.len());
        for size in sizes {
            let row = sqlx::query_as::<_, ProductSize>(&query)
                .bind(product_id)
                .bind(size.size_label.trim())
                .bind(size.price)
                .fetch_one(&mut **tx)
                .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }
}
