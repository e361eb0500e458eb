//! Shared HTTP plumbing: application state, request/response shapes, error
//! mapping, and the health check.
//!
//! Feature handlers live in [`super::controllers`].

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::classroom::ClassroomApi;
use crate::error::ApiError;
use crate::store::ClassroomStore;

use super::auth::StateSigner;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state handed to every handler.
///
/// Holds the classroom adapter, the document store, and the OAuth state
/// signer. Nothing else is shared between requests.
pub struct AppState<C: ClassroomApi, S: ClassroomStore> {
    pub classroom: Arc<C>,
    pub store: Arc<S>,
    pub state_signer: StateSigner,
}

impl<C: ClassroomApi, S: ClassroomStore> AppState<C, S> {
    pub fn new(classroom: C, store: S, state_signer: StateSigner) -> Self {
        Self {
            classroom: Arc::new(classroom),
            store: Arc::new(store),
            state_signer,
        }
    }
}

impl<C: ClassroomApi, S: ClassroomStore> Clone for AppState<C, S> {
    fn clone(&self) -> Self {
        Self {
            classroom: Arc::clone(&self.classroom),
            store: Arc::clone(&self.store),
            state_signer: self.state_signer.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// `?courseId=` query parameter shared by the course and student routes.
#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    #[serde(rename = "courseId", default)]
    pub course_id: Option<String>,
}

impl CourseQuery {
    /// The trimmed course id, or `InvalidInput` when absent or blank.
    pub fn require_course_id(&self) -> Result<&str, ApiError> {
        require_course_id(self.course_id.as_deref())
    }
}

/// Validate a course id taken from a query string or form field.
pub fn require_course_id(course_id: Option<&str>) -> Result<&str, ApiError> {
    match course_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::InvalidInput("courseId is required".to_string())),
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_input", "store_unavailable")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of write endpoints that only report success.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ApiError to an HTTP response.
///
/// A rejected OAuth state is the caller's fault and answers 401 with the
/// reason. Everything else answers 500 with the error kind only; the detail
/// goes to the log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = self.error_type();

        let (status, message) = match &self {
            ApiError::State(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Request failed: {}",
                self
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Request rejected: {}",
                self
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check.
///
/// `GET /health` answers `{"status": "healthy", "version": "<crate version>"}`
/// without touching the store or the classroom service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
