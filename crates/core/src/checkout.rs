//! Checkout: gateway line items, the hosted-session seam, and order drafts.
//!
//! Prices always come from the cart lines as just read from the catalog, never
//! from the client. The order is only written after the shopper returns from
//! the hosted page with a success marker.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::CoreError;
use crate::money::{line_total, to_minor_units};
use crate::orders::{OrderStatus, PaymentStatus};
use crate::types::DbId;

/// Placeholder the gateway substitutes with the real session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Message shown when the order insert fails after a successful payment.
pub const ORDER_CREATION_FAILED: &str = "Order creation failed. Please contact support.";

// ---------------------------------------------------------------------------
// Gateway request
// ---------------------------------------------------------------------------

/// One priced line on the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayLineItem {
    /// `"{product} ({size})"`.
    pub label: String,
    /// Price per unit in minor currency units.
    pub unit_amount: i64,
    pub quantity: i32,
    pub image: Option<String>,
}

impl GatewayLineItem {
    pub fn from_cart_line(line: &CartLine) -> Result<Self, CoreError> {
        Ok(Self {
            label: format!("{} ({})", line.product_name, line.size_label),
            unit_amount: to_minor_units(line.unit_price)?,
            quantity: line.quantity,
            image: line.product_image.clone(),
        })
    }
}

/// Everything the gateway needs to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<GatewayLineItem>,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    /// The buyer's user id, echoed back in gateway metadata.
    pub client_reference: DbId,
}

impl CheckoutSessionRequest {
    /// Build a session request from the user's current cart.
    ///
    /// Fails with [`CoreError::EmptyCart`] when there is nothing to pay for.
    pub fn build(
        user_id: DbId,
        lines: &[CartLine],
        currency: &str,
        return_url: &str,
    ) -> Result<Self, CoreError> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let return_url = return_url.trim();
        if return_url.is_empty() {
            return Err(CoreError::Validation("returnUrl is required".to_string()));
        }

        let line_items = lines
            .iter()
            .map(GatewayLineItem::from_cart_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            line_items,
            currency: currency.to_string(),
            success_url: format!("{return_url}?success=true&session_id={SESSION_ID_PLACEHOLDER}"),
            cancel_url: format!("{return_url}?canceled=true"),
            client_reference: user_id,
        })
    }

    /// Total in minor units, for logging.
    pub fn amount_minor(&self) -> i64 {
        self.line_items
            .iter()
            .map(|li| li.unit_amount * i64::from(li.quantity))
            .sum()
    }
}

/// A hosted session the shopper should be redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySession {
    pub id: String,
    pub url: String,
}

/// Gateway failure with the raw provider payload kept for operators.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub details: serde_json::Value,
}

impl GatewayError {
    pub fn new(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }
}

impl From<GatewayError> for CoreError {
    fn from(err: GatewayError) -> Self {
        CoreError::Gateway {
            message: err.message,
            details: err.details,
        }
    }
}

/// Hosted payment page provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<GatewaySession, GatewayError>;
}

// ---------------------------------------------------------------------------
// Return leg
// ---------------------------------------------------------------------------

/// What the hosted page reported when it sent the shopper back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Success { session_id: Option<String> },
    Canceled,
}

/// Delivery metadata captured before the redirect and replayed on return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    /// Special instructions, e.g. cake message or allergy info.
    #[serde(default)]
    pub notes: String,
}

/// Frozen copy of a cart line stored on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: DbId,
    pub product_name: String,
    pub product_slug: String,
    pub image: Option<String>,
    pub size_id: DbId,
    pub size_label: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            product_slug: line.product_slug.clone(),
            image: line.product_image.clone(),
            size_id: line.size_id,
            size_label: line.size_label.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// An order ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub user_id: DbId,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_session_id: Option<String>,
    pub delivery: DeliveryDetails,
}

impl OrderDraft {
    /// Freeze the given cart lines into a paid, pending order.
    pub fn from_cart(
        user_id: DbId,
        lines: &[CartLine],
        payment_session_id: Option<String>,
        delivery: DeliveryDetails,
    ) -> Result<Self, CoreError> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let items: Vec<OrderItem> = lines.iter().map(OrderItem::from).collect();
        let total_price = items
            .iter()
            .map(|i| line_total(i.unit_price, i.quantity))
            .sum();

        Ok(Self {
            user_id,
            items,
            total_price,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_session_id,
            delivery,
        })
    }
}
