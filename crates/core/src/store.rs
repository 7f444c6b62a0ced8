//! Error type shared by the cart and wishlist store traits.

use crate::error::CoreError;
use crate::types::DbId;

/// Failure reported by a store of record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (concurrent insert of the same row).
    #[error("Duplicate row")]
    Duplicate,

    /// The referenced row does not exist for this user.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => CoreError::Conflict("Row already exists".to_string()),
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}
