//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the PeerSlot
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! The implementation is based on Axum's error handling mechanisms and
//! integrates with PeerSlot's custom error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use peerslot_core::errors::SlotError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `SlotError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use peerslot_api::middleware::error_handling::AppError;
/// use peerslot_core::errors::SlotError;
/// use uuid::Uuid;
///
/// // Type definitions to make the example compile
/// struct SlotView {}
/// struct Repository {}
///
/// impl Repository {
///     async fn get_slot(&self, _id: Uuid) -> Result<SlotView, String> {
///         Ok(SlotView {})
///     }
/// }
///
/// async fn handler(id: Uuid) -> Result<Json<SlotView>, AppError> {
///     let repository = Repository {};
///     let slot = repository.get_slot(id)
///         .await
///         .map_err(|e| AppError(SlotError::NotFound(e.to_string())))?;
///
///     Ok(Json(slot))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SlotError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status
/// code and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            SlotError::NotFound(_) => StatusCode::NOT_FOUND,
            SlotError::Validation(_) => StatusCode::BAD_REQUEST,
            SlotError::Identity(_) => StatusCode::UNAUTHORIZED,
            SlotError::Authorization(_) => StatusCode::FORBIDDEN,
            SlotError::Conflict(_) => StatusCode::CONFLICT,
            SlotError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SlotError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from SlotError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, SlotError>` in handler functions that return `Result<T, AppError>`.
impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return
/// `Result<T, AppError>`. It wraps the eyre error in a `SlotError::Database`
/// variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SlotError::Database(err))
    }
}

/// Maps a SlotError to an HTTP response
///
/// # Arguments
///
/// * `err` - The SlotError to convert
///
/// # Returns
///
/// * `Response` - An HTTP response with appropriate status code and body
pub fn map_error(err: SlotError) -> Response {
    AppError(err).into_response()
}
