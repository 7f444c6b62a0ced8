//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Writers publish a [`StoreEvent`] after every committed change. Open views
//! (e.g. a live cart socket) subscribe and re-read from the database when a
//! relevant event arrives. Events carry no state, only "something changed".

use bakery_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

// ---------------------------------------------------------------------------
// StoreEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEventKind {
    CartChanged,
    WishlistChanged,
    OrderCreated,
    OrderStatusChanged,
}

/// A committed change to one user's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    pub kind: StoreEventKind,
    /// Owner of the changed rows.
    pub user_id: DbId,
    /// Id of the changed row, when a single row is involved.
    pub entity_id: Option<DbId>,
    pub timestamp: Timestamp,
}

impl StoreEvent {
    pub fn new(kind: StoreEventKind, user_id: DbId) -> Self {
        Self {
            kind,
            user_id,
            entity_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_entity(mut self, entity_id: DbId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn cart_changed(user_id: DbId) -> Self {
        Self::new(StoreEventKind::CartChanged, user_id)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus, shared as `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: StoreEvent) {
        tracing::trace!(kind = ?event.kind, user_id = event.user_id, "Publishing store event");
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to cart changes for one user.
    pub fn subscribe_cart(&self, user_id: DbId) -> CartSubscription {
        CartSubscription {
            user_id,
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// CartSubscription
// ---------------------------------------------------------------------------

/// Cart change feed for one user. Dropping it unsubscribes.
pub struct CartSubscription {
    user_id: DbId,
    receiver: broadcast::Receiver<StoreEvent>,
}

impl CartSubscription {
    /// Wait for the next change to this user's cart.
    ///
    /// A lagged receiver counts as a change, since missed events call for the
    /// same refresh. Returns `None` once the bus is gone.
    pub async fn changed(&mut self) -> Option<()> {
        loop {
            match self.receiver.recv().await {
                Ok(event)
                    if event.user_id == self.user_id
                        && event.kind == StoreEventKind::CartChanged =>
                {
                    return Some(());
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(user_id = self.user_id, skipped, "Cart subscription lagged");
                    return Some(());
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Explicitly end the subscription.
    pub fn unsubscribe(self) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
