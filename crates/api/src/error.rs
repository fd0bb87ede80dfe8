//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fulfillment::CheckoutError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Checkout pipeline error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, &msg, None),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, &msg, None)
            }
        }
    }
}

/// Maps the checkout taxonomy to HTTP statuses. Integration failures are
/// partial success: the order is persisted, so its id is included in the
/// body.
fn checkout_error_to_response(err: CheckoutError) -> Response {
    let order_id = err.persisted_order_id();
    let status = match &err {
        CheckoutError::BasketNotFound(_) => StatusCode::NOT_FOUND,
        CheckoutError::EmptyBasket(_)
        | CheckoutError::UnknownCatalogItem(_)
        | CheckoutError::Order(_) => StatusCode::BAD_REQUEST,
        CheckoutError::PublishFailed { .. } | CheckoutError::DeliveryFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
        CheckoutError::Store(_) | CheckoutError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_body(status, &err.to_string(), order_id.map(|id| id.as_i64()))
}

fn error_body(status: StatusCode, message: &str, order_id: Option<i64>) -> Response {
    let body = match order_id {
        Some(id) => serde_json::json!({ "error": message, "order_id": id }),
        None => serde_json::json!({ "error": message }),
    };
    (status, axum::Json(body)).into_response()
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}
