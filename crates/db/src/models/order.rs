//! Order models.

use bakery_core::checkout::{DeliveryDetails, OrderItem};
use bakery_core::error::CoreError;
use bakery_core::orders::{OrderStatus, PaymentStatus};
use bakery_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub items: Json<Vec<OrderItem>>,
    pub total_price: Decimal,
    pub status: String,
    pub payment_status: String,
    pub payment_session_id: Option<String>,
    pub delivery_address: Json<DeliveryDetails>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn status(&self) -> Result<OrderStatus, CoreError> {
        self.status.parse()
    }

    pub fn payment_status(&self) -> Result<PaymentStatus, CoreError> {
        self.payment_status.parse()
    }
}

/// An order with the customer's profile details, for the back office.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminOrder {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// DTO for an admin status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}
