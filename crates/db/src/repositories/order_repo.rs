//! Repository for the `orders` table.
//!
//! `items` and `total_price` are written once at insert and never updated.

use bakery_core::checkout::OrderDraft;
use bakery_core::orders::OrderStatus;
use bakery_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::order::{AdminOrder, Order};

const COLUMNS: &str = "id, user_id, items, total_price, status, payment_status, \
                       payment_session_id, delivery_address, created_at, updated_at";

/// Same columns qualified with the `o` alias for joined queries.
const O_COLUMNS: &str = "o.id, o.user_id, o.items, o.total_price, o.status, o.payment_status, \
                         o.payment_session_id, o.delivery_address, o.created_at, o.updated_at";

pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order from a draft, returning the created row.
    pub async fn create(pool: &PgPool, draft: &OrderDraft) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (user_id, items, total_price, status, payment_status, payment_session_id, delivery_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(draft.user_id)
            .bind(Json(&draft.items))
            .bind(draft.total_price)
            .bind(draft.status.as_str())
            .bind(draft.payment_status.as_str())
            .bind(&draft.payment_session_id)
            .bind(Json(&draft.delivery))
            .fetch_one(pool)
            .await
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every order with customer details, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {O_COLUMNS}, p.full_name AS customer_name, p.phone AS customer_phone
             FROM orders o
             LEFT JOIN profiles p ON p.id = o.user_id
             ORDER BY o.created_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, AdminOrder>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {O_COLUMNS}, p.full_name AS customer_name, p.phone AS customer_phone
             FROM orders o
             LEFT JOIN profiles p ON p.id = o.user_id
             WHERE o.id = $1"
        );
        sqlx::query_as::<_, AdminOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the fulfilment status. Returns `None` if no order has the given `id`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: OrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
