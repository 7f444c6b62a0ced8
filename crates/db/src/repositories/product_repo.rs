//! Repository for the `products` table.

use bakery_core::catalog::ProductFilter;
use bakery_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{
    CreateProductSize, Product, ProductInput, ProductUpdate, ProductWithSizes,
};
use crate::repositories::ProductSizeRepo;

/// Column list shared across queries.
const COLUMNS: &str = "id, name, slug, description, category, images, video, tags, \
                       is_available, is_featured, created_at, updated_at";

/// How many products the home page features.
pub const FEATURED_LIMIT: i64 = 4;

/// Catalog reads for the storefront and product writes for the back office.
pub struct ProductRepo;

impl ProductRepo {
    /// Storefront listing. Only available products; newest first.
    ///
    /// Tags are matched with array overlap, so the filter's tags should
    /// already be expanded into casing variants.
    pub async fn list_storefront(
        pool: &PgPool,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE is_available = TRUE
               AND ($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL OR name ILIKE $2)
               AND ($3::TEXT[] IS NULL OR tags && $3)
               AND ($4 = FALSE OR is_featured = TRUE)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.category.as_deref())
            .bind(filter.search_pattern())
            .bind(filter.expanded_tags())
            .bind(filter.featured)
            .fetch_all(pool)
            .await
    }

    /// Available, featured products for the home page.
    pub async fn list_featured(pool: &PgPool, limit: i64) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE is_available = TRUE AND is_featured = TRUE
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every product, including unavailable ones, for the back office.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an available product by slug, with its sizes.
    pub async fn find_by_slug_with_sizes(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ProductWithSizes>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE slug = $1 AND is_available = TRUE");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        match product {
            Some(product) => {
                let sizes = ProductSizeRepo::list_for_product(pool, product.id).await?;
                Ok(Some(ProductWithSizes { product, sizes }))
            }
            None => Ok(None),
        }
    }

    /// Find any product by id, with its sizes.
    pub async fn find_by_id_with_sizes(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithSizes>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(product) => {
                let sizes = ProductSizeRepo::list_for_product(pool, product.id).await?;
                Ok(Some(ProductWithSizes { product, sizes }))
            }
            None => Ok(None),
        }
    }

    /// Insert a product and its sizes in one transaction.
    pub async fn create(
        pool: &PgPool,
        slug: &str,
        input: &ProductInput,
        sizes: &[CreateProductSize],
    ) -> Result<ProductWithSizes, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products
                (name, slug, description, category, images, video, tags, is_available, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.images)
            .bind(&input.video)
            .bind(&input.tags)
            .bind(input.is_available)
            .bind(input.is_featured)
            .fetch_one(&mut *tx)
            .await?;

        let sizes = ProductSizeRepo::insert_many(&mut tx, product.id, sizes).await?;

        tx.commit().await?;
        Ok(ProductWithSizes { product, sizes })
    }

    /// Overwrite a product's fields and replace all of its sizes. The slug is
    /// left unchanged.
    ///
    /// Returns `None` if no product has the given `id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProductInput,
        sizes: &[CreateProductSize],
    ) -> Result<Option<ProductUpdate>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET
                name = $2,
                description = $3,
                category = $4,
                images = $5,
                video = $6,
                tags = $7,
                is_available = $8,
                is_featured = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.images)
            .bind(&input.video)
            .bind(&input.tags)
            .bind(input.is_available)
            .bind(input.is_featured)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(product) = product else {
            tx.rollback().await?;
            return Ok(None);
        };

        // Cart lines reference sizes and cascade with them.
        let emptied_carts: Vec<DbId> = sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM cart WHERE product_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let sizes = ProductSizeRepo::insert_many(&mut tx, id, sizes).await?;

        tx.commit().await?;
        Ok(Some(ProductUpdate {
            product: ProductWithSizes { product, sizes },
            emptied_carts,
        }))
    }

    /// Set the featured flag. Returns `None` if no product has the given `id`.
    pub async fn set_featured(
        pool: &PgPool,
        id: DbId,
        is_featured: bool,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET is_featured = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(is_featured)
            .fetch_optional(pool)
            .await
    }
}
