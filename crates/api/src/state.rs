use std::sync::Arc;

use bakery_core::checkout::PaymentGateway;
use bakery_events::EventBus;

use crate::config::ServerConfig;

/// Handler state. Clones share the pool, config, bus and gateway.
#[derive(Clone)]
pub struct AppState {
    pub pool: bakery_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Cart, wishlist and order change notifications.
    pub event_bus: Arc<EventBus>,
    /// Hosted payment page provider. Tests swap in a recording fake.
    pub payment_gateway: Arc<dyn PaymentGateway>,
}
