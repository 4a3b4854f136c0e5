//! Gateway request/response types and the API error envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::StoreError;

// ============================================================================
// API Errors
// ============================================================================

/// API error codes (1xxx client, 2xxx auth, 4xxx resource, 5xxx server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ApiErrorCode {
    /// 1001: request body missing required fields
    InvalidPayload = 1001,
    /// 2002: missing or mismatched API key
    Unauthorized = 2002,
    /// 4001: unknown order id
    OrderNotFound = 4001,
    /// 5000: persistence failure
    InternalError = 5000,
}

impl ApiErrorCode {
    /// Get error code as i32.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get error name string.
    pub fn name(self) -> &'static str {
        match self {
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code.
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidPayload => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error with message.
#[derive(Debug)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(ApiErrorCode::Unauthorized, "Invalid API key")
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidPayload, message)
    }

    pub fn not_found() -> Self {
        Self::new(ApiErrorCode::OrderNotFound, "Order not found")
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::new(ApiErrorCode::InternalError, e.to_string())
    }
}

/// JSON response body for API errors.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: i32,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code.code(),
            error: self.code.name(),
            message: self.message,
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// POST /order request body.
///
/// Both fields are required. They are optional here so that a missing
/// field maps to the domain `InvalidPayload` error instead of a
/// framework-level rejection.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: Option<Value>,
    pub items: Option<Value>,
}

/// Acknowledgment for create/resend. Dispatch runs in the background;
/// callers poll GET /order/{id} for the outcome.
#[derive(Debug, Serialize)]
pub struct OrderAccepted {
    pub message: &'static str,
    pub order_id: String,
}

/// GET /health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Server timestamp in milliseconds
    pub timestamp_ms: u64,
}
