//! Per-user wishlist with toggle semantics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::store::StoreError;
use crate::types::{DbId, Timestamp};

/// A wishlist entry joined with product display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistLine {
    pub id: DbId,
    pub product_id: DbId,
    pub size_id: Option<DbId>,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub created_at: Timestamp,
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggled {
    Added,
    Removed,
}

/// Persistence for wishlist lines. One line per (user, product).
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Returns [`StoreError::Duplicate`] if the product is already listed.
    async fn insert(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: Option<DbId>,
    ) -> Result<DbId, StoreError>;

    async fn delete(&self, user_id: DbId, product_id: DbId) -> Result<(), StoreError>;

    /// Newest first.
    async fn list(&self, user_id: DbId) -> Result<Vec<WishlistLine>, StoreError>;
}

/// Local cache of one user's wishlist.
pub struct WishlistView<'a, S: WishlistStore + ?Sized> {
    store: &'a S,
    user_id: DbId,
    lines: Vec<WishlistLine>,
}

impl<'a, S: WishlistStore + ?Sized> WishlistView<'a, S> {
    pub async fn load(store: &'a S, user_id: DbId) -> Result<Self, CoreError> {
        let lines = store.list(user_id).await?;
        Ok(Self {
            store,
            user_id,
            lines,
        })
    }

    pub fn lines(&self) -> &[WishlistLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<WishlistLine> {
        self.lines
    }

    pub fn is_in_wishlist(&self, product_id: DbId) -> bool {
        self.lines.iter().any(|l| l.product_id == product_id)
    }

    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.lines = self.store.list(self.user_id).await?;
        Ok(())
    }

    /// Add the product if absent, remove it if present.
    pub async fn toggle(
        &mut self,
        product_id: DbId,
        size_id: Option<DbId>,
    ) -> Result<Toggled, CoreError> {
        if self.is_in_wishlist(product_id) {
            self.lines.retain(|l| l.product_id != product_id);
            let deleted = self.store.delete(self.user_id, product_id).await;
            if let Err(e) = deleted {
                tracing::warn!(user_id = self.user_id, product_id, error = %e, "Wishlist delete failed, resyncing");
                self.refresh().await?;
                return Err(e.into());
            }
            return Ok(Toggled::Removed);
        }

        let inserted = self.store.insert(self.user_id, product_id, size_id).await;
        match inserted {
            Ok(_) => {
                self.refresh().await?;
                Ok(Toggled::Added)
            }
            Err(StoreError::Duplicate) => {
                // Another session added it first; it is present either way.
                self.refresh().await?;
                Ok(Toggled::Added)
            }
            Err(e) => {
                tracing::warn!(user_id = self.user_id, product_id, error = %e, "Wishlist insert failed, resyncing");
                self.refresh().await?;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct MemoryWishlist {
        rows: Mutex<Vec<WishlistLine>>,
        fail_deletes: AtomicBool,
    }

    #[async_trait]
    impl WishlistStore for MemoryWishlist {
        async fn insert(
            &self,
            _user_id: DbId,
            product_id: DbId,
            size_id: Option<DbId>,
        ) -> Result<DbId, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.product_id == product_id) {
                return Err(StoreError::Duplicate);
            }
            let id = rows.len() as DbId + 1;
            rows.push(WishlistLine {
                id,
                product_id,
                size_id,
                product_name: format!("Product {product_id}"),
                product_slug: format!("product-{product_id}"),
                product_image: None,
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn delete(&self, _user_id: DbId, product_id: DbId) -> Result<(), StoreError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("timeout".into()));
            }
            self.rows.lock().unwrap().retain(|r| r.product_id != product_id);
            Ok(())
        }

        async fn list(&self, _user_id: DbId) -> Result<Vec<WishlistLine>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_toggle_is_its_own_inverse() {
        let store = MemoryWishlist::default();
        store.insert(1, 7, None).await.unwrap();
        let mut view = WishlistView::load(&store, 1).await.unwrap();
        let before: Vec<DbId> = view.lines().iter().map(|l| l.product_id).collect();

        assert_eq!(view.toggle(3, None).await.unwrap(), Toggled::Added);
        assert!(view.is_in_wishlist(3));
        assert_eq!(view.toggle(3, None).await.unwrap(), Toggled::Removed);
        assert!(!view.is_in_wishlist(3));

        let after: Vec<DbId> = view.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_toggle_present_product_removes_it() {
        let store = MemoryWishlist::default();
        store.insert(1, 7, Some(2)).await.unwrap();
        let mut view = WishlistView::load(&store, 1).await.unwrap();

        assert_eq!(view.toggle(7, None).await.unwrap(), Toggled::Removed);
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_restores_entry() {
        let store = MemoryWishlist::default();
        store.insert(1, 7, None).await.unwrap();
        let mut view = WishlistView::load(&store, 1).await.unwrap();

        store.fail_deletes.store(true, Ordering::SeqCst);
        assert!(view.toggle(7, None).await.is_err());
        assert!(view.is_in_wishlist(7));
    }

    #[tokio::test]
    async fn test_stale_view_treats_duplicate_as_added() {
        let store = MemoryWishlist::default();
        let mut view = WishlistView::load(&store, 1).await.unwrap();
        // Added elsewhere after this view loaded.
        store.insert(1, 9, None).await.unwrap();

        assert_eq!(view.toggle(9, None).await.unwrap(), Toggled::Added);
        assert!(view.is_in_wishlist(9));
    }
}
