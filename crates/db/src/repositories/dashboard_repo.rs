//! Aggregate counts for the back-office dashboard.
//!
//! Each figure is its own query so callers can run them concurrently.

use rust_decimal::Decimal;
use sqlx::PgPool;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn count_products(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_orders(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Sum of `total_price` over orders with payment status `paid`.
    pub async fn paid_revenue(pool: &PgPool) -> Result<Decimal, sqlx::Error> {
        let (sum,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_price), 0)::NUMERIC FROM orders WHERE payment_status = 'paid'",
        )
        .fetch_one(pool)
        .await?;
        Ok(sum)
    }

    pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
