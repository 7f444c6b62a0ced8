//! Postgres implementations of the core cart and wishlist store traits.

use async_trait::async_trait;
use bakery_core::cart::{CartLine, CartStore, PersistedLine};
use bakery_core::store::StoreError;
use bakery_core::types::DbId;
use bakery_core::wishlist::{WishlistLine, WishlistStore};
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::repositories::{CartRepo, WishlistRepo};

fn store_error(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Duplicate
    } else {
        StoreError::Backend(err.to_string())
    }
}

/// [`CartStore`] backed by the `cart` table.
#[derive(Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_line(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
    ) -> Result<Option<PersistedLine>, StoreError> {
        CartRepo::find_line(&self.pool, user_id, product_id, size_id)
            .await
            .map(|row| row.map(PersistedLine::from))
            .map_err(store_error)
    }

    async fn insert_line(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
        quantity: i32,
    ) -> Result<DbId, StoreError> {
        CartRepo::insert(&self.pool, user_id, product_id, size_id, quantity)
            .await
            .map_err(store_error)
    }

    async fn set_quantity(
        &self,
        user_id: DbId,
        line_id: DbId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let updated = CartRepo::set_quantity(&self.pool, user_id, line_id, quantity)
            .await
            .map_err(store_error)?;
        if updated {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "CartLine",
                id: line_id,
            })
        }
    }

    async fn delete_line(&self, user_id: DbId, line_id: DbId) -> Result<(), StoreError> {
        let deleted = CartRepo::delete(&self.pool, user_id, line_id)
            .await
            .map_err(store_error)?;
        if deleted {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "CartLine",
                id: line_id,
            })
        }
    }

    async fn list_lines(&self, user_id: DbId) -> Result<Vec<CartLine>, StoreError> {
        let rows = CartRepo::list_for_user(&self.pool, user_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    async fn clear(&self, user_id: DbId) -> Result<u64, StoreError> {
        CartRepo::clear(&self.pool, user_id)
            .await
            .map_err(store_error)
    }
}

/// [`WishlistStore`] backed by the `wishlist` table.
#[derive(Clone)]
pub struct PgWishlistStore {
    pool: PgPool,
}

impl PgWishlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistStore for PgWishlistStore {
    async fn insert(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: Option<DbId>,
    ) -> Result<DbId, StoreError> {
        WishlistRepo::insert(&self.pool, user_id, product_id, size_id)
            .await
            .map_err(store_error)
    }

    /// Deleting an absent product is not an error; the end state is the same.
    async fn delete(&self, user_id: DbId, product_id: DbId) -> Result<(), StoreError> {
        WishlistRepo::delete(&self.pool, user_id, product_id)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn list(&self, user_id: DbId) -> Result<Vec<WishlistLine>, StoreError> {
        let rows = WishlistRepo::list_for_user(&self.pool, user_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(WishlistLine::from).collect())
    }
}
