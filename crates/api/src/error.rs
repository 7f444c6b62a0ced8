use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bakery_core::checkout::ORDER_CREATION_FAILED;
use bakery_core::error::CoreError;
use serde::Serialize;

/// Message returned for every 500 that is not a gateway or order failure.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type for HTTP handlers.
///
/// Domain failures arrive as [`CoreError`]; the remaining variants cover
/// what only the HTTP layer knows about. Every variant renders as
/// `{"error": <message>, "code": <CODE>}`, plus `details` for gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A resource addressed by something other than its id, such as a slug.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payment went through but the order row could not be written.
    #[error("Order insert failed: {0}")]
    OrderNotCreated(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(core) => core_status_and_body(core),
            AppError::Database(err) => sqlx_status_and_body(err),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg.as_str()))
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg.as_str()))
            }
            AppError::OrderNotCreated(err) => {
                tracing::error!(error = %err, "Order insert failed after payment");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("ORDER_CREATION_FAILED", ORDER_CREATION_FAILED),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn core_status_and_body(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", msg.as_str()),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.as_str())),
        CoreError::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", msg.as_str()),
        ),
        CoreError::Forbidden(msg) => {
            (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg.as_str()))
        }
        CoreError::EmptyCart => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("EMPTY_CART", "Your cart is empty"),
        ),
        CoreError::Gateway { message, details } => {
            let mut body = ErrorBody::new("GATEWAY_ERROR", message.as_str());
            body.details = Some(details.clone());
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// `RowNotFound` is a 404 and a unique violation on a `uq_*` constraint is a
/// 409. Anything else is logged and reported as a bare 500.
fn sqlx_status_and_body(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err
            .constraint()
            .filter(|_| db_err.code().as_deref() == Some(bakery_db::UNIQUE_VIOLATION))
            .filter(|name| name.starts_with("uq_"));
        if let Some(constraint) = constraint {
            return (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
            );
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
}
