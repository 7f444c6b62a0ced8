//! Change notification for the storefront.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoreEvent`]: what changed, for whom.
//! - [`CartSubscription`]: one user's cart change feed, torn down on drop.

pub mod bus;

pub use bus::{CartSubscription, EventBus, StoreEvent, StoreEventKind};
