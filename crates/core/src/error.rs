use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Checkout was attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The payment gateway rejected or failed a request.
    ///
    /// `details` carries the raw gateway error payload for operators.
    #[error("Payment gateway error: {message}")]
    Gateway {
        message: String,
        details: serde_json::Value,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
