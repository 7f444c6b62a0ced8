//! Back-office dashboard figures.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    /// Sum of `total_price` over paid orders.
    pub total_revenue: Decimal,
    pub total_users: i64,
    /// Revenue divided by order count, or zero without orders.
    pub average_order_value: Decimal,
}

impl DashboardStats {
    pub fn new(
        total_products: i64,
        total_orders: i64,
        total_revenue: Decimal,
        total_users: i64,
    ) -> Self {
        let average_order_value = if total_orders > 0 {
            (total_revenue / Decimal::from(total_orders)).round_dp(2)
        } else {
            Decimal::ZERO
        };
        Self {
            total_products,
            total_orders,
            total_revenue,
            total_users,
            average_order_value,
        }
    }
}
