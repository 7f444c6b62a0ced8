//! Order fulfilment and payment status.
//!
//! Values must match the `orders.status` and `orders.payment_status` check
//! constraints in `20260301000007_create_orders.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Fulfilment status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// The next step on the fulfilment path, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Statuses reachable from `self` in one admin action.
    pub fn allowed_transitions(self) -> Vec<OrderStatus> {
        let mut allowed: Vec<OrderStatus> = self.next().into_iter().collect();
        if self != OrderStatus::Cancelled {
            allowed.push(OrderStatus::Cancelled);
        }
        allowed
    }

    pub fn can_transition(self, to: OrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid order status '{s}'")))
    }
}

/// Validate an admin status change. Only one step forward is allowed, or a
/// cancel from any state that is not already cancelled.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        let allowed: Vec<&str> = from
            .allowed_transitions()
            .into_iter()
            .map(OrderStatus::as_str)
            .collect();
        Err(CoreError::Validation(format!(
            "Cannot transition order from '{from}' to '{to}'. Allowed transitions: {allowed:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Payment status
// ---------------------------------------------------------------------------

/// Set once when the order is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            other => Err(CoreError::Validation(format!(
                "Invalid payment status '{other}'"
            ))),
        }
    }
}
