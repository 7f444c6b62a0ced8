//! Per-user cart: the store-of-record seam and the optimistic local view.
//!
//! [`CartView`] mutates its local lines first, then persists. When a write
//! fails the view throws its local state away and reloads from the store.
//! There is no retry; [`CartView::refresh`] is the only recovery path.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::line_total;
use crate::store::StoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 999;

fn too_many() -> CoreError {
    CoreError::Validation(format!(
        "Quantity cannot exceed {MAX_LINE_QUANTITY} per item"
    ))
}

/// A cart line joined with its product and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: DbId,
    pub product_id: DbId,
    pub size_id: DbId,
    pub quantity: i32,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: Option<String>,
    pub size_label: String,
    /// Current catalog price of the size.
    pub unit_price: Decimal,
    pub created_at: Timestamp,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        line_total(self.unit_price, self.quantity)
    }
}

/// Id and quantity of the persisted line for a (user, product, size) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedLine {
    pub id: DbId,
    pub quantity: i32,
}

/// What `add_item` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "line_id")]
pub enum AddOutcome {
    /// A new line was inserted.
    Inserted(DbId),
    /// The quantity was added to an existing line.
    Merged(DbId),
    /// A concurrent insert of the same triple won; the view was resynced.
    RecoveredFromRace,
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence for cart lines, scoped by user on every call.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_line(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
    ) -> Result<Option<PersistedLine>, StoreError>;

    /// Insert a new line. Returns [`StoreError::Duplicate`] when the triple
    /// already exists.
    async fn insert_line(
        &self,
        user_id: DbId,
        product_id: DbId,
        size_id: DbId,
        quantity: i32,
    ) -> Result<DbId, StoreError>;

    async fn set_quantity(
        &self,
        user_id: DbId,
        line_id: DbId,
        quantity: i32,
    ) -> Result<(), StoreError>;

    async fn delete_line(&self, user_id: DbId, line_id: DbId) -> Result<(), StoreError>;

    /// All lines for the user, newest first.
    async fn list_lines(&self, user_id: DbId) -> Result<Vec<CartLine>, StoreError>;

    /// Delete every line for the user, returning how many were removed.
    async fn clear(&self, user_id: DbId) -> Result<u64, StoreError>;
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Local cache of one user's cart over a [`CartStore`].
pub struct CartView<'a, S: CartStore + ?Sized> {
    store: &'a S,
    user_id: DbId,
    lines: Vec<CartLine>,
}

impl<'a, S: CartStore + ?Sized> CartView<'a, S> {
    /// Load the user's cart from the store.
    pub async fn load(store: &'a S, user_id: DbId) -> Result<Self, CoreError> {
        let lines = store.list_lines(user_id).await?;
        Ok(Self {
            store,
            user_id,
            lines,
        })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across lines.
    pub fn count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across lines.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Reload every line from the store, replacing local state.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.lines = self.store.list_lines(self.user_id).await?;
        Ok(())
    }

    /// Recover after a failed write: reload, then hand back the original error.
    async fn resync_after(&mut self, op: &'static str, err: StoreError) -> CoreError {
        tracing::warn!(user_id = self.user_id, op, error = %err, "Cart write failed, resyncing");
        if let Err(reload_err) = self.refresh().await {
            tracing::error!(user_id = self.user_id, error = %reload_err, "Cart resync failed");
            self.lines.clear();
        }
        err.into()
    }

    /// Add `quantity` of a product size, merging into an existing line.
    pub async fn add_item(
        &mut self,
        product_id: DbId,
        size_id: DbId,
        quantity: i32,
    ) -> Result<AddOutcome, CoreError> {
        if quantity < 1 {
            return Err(CoreError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(too_many());
        }

        let found = self.store.find_line(self.user_id, product_id, size_id).await;
        let existing = match found {
            Ok(existing) => existing,
            Err(e) => return Err(self.resync_after("find_line", e).await),
        };

        if let Some(line) = existing {
            let merged = line
                .quantity
                .checked_add(quantity)
                .filter(|q| *q <= MAX_LINE_QUANTITY)
                .ok_or_else(too_many)?;
            self.update_quantity(line.id, merged).await?;
            return Ok(AddOutcome::Merged(line.id));
        }

        let inserted = self
            .store
            .insert_line(self.user_id, product_id, size_id, quantity)
            .await;
        match inserted {
            Ok(line_id) => {
                self.refresh().await?;
                Ok(AddOutcome::Inserted(line_id))
            }
            Err(StoreError::Duplicate) => {
                tracing::debug!(
                    user_id = self.user_id,
                    product_id,
                    size_id,
                    "Concurrent cart insert detected, resyncing"
                );
                self.refresh().await?;
                Ok(AddOutcome::RecoveredFromRace)
            }
            Err(e) => Err(self.resync_after("insert_line", e).await),
        }
    }

    /// Replace a line's quantity. Anything below 1 removes the line.
    pub async fn update_quantity(&mut self, line_id: DbId, quantity: i32) -> Result<(), CoreError> {
        if quantity < 1 {
            return self.remove_item(line_id).await;
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(too_many());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
        }

        let persisted = self
            .store
            .set_quantity(self.user_id, line_id, quantity)
            .await;
        match persisted {
            Ok(()) => Ok(()),
            Err(e) => Err(self.resync_after("set_quantity", e).await),
        }
    }

    /// Remove a line.
    pub async fn remove_item(&mut self, line_id: DbId) -> Result<(), CoreError> {
        self.lines.retain(|l| l.id != line_id);

        let deleted = self.store.delete_line(self.user_id, line_id).await;
        match deleted {
            Ok(()) => Ok(()),
            Err(e) => Err(self.resync_after("delete_line", e).await),
        }
    }
}
