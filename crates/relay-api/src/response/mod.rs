//! Response types and error handling for API endpoints
//!
//! Errors reach the client as `{"error": "..."}` with a generic message;
//! the detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_common::AppError;
use relay_core::DomainError;
use relay_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    App(#[from] AppError),
}

impl ApiError {
    /// Get HTTP status code for this error
    ///
    /// Only "not found" is a client error; everything else is a 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::Service(e) => e.status_code(),
            Self::App(e) => e.status_code(),
        };
        match code {
            404 => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Service(e) => e.error_code(),
            Self::App(e) => e.error_code(),
        }
    }

    /// Message safe to show to callers
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Service(ServiceError::Domain(DomainError::GuildNotFound(_)))
            | Self::App(AppError::Domain(DomainError::GuildNotFound(_))) => "Guild not found",
            Self::Service(ServiceError::Domain(DomainError::MemberNotFound { .. })) => {
                "User not found in this guild"
            }
            _ if self.status_code() == StatusCode::NOT_FOUND => "User not found",
            _ => "Internal server error",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            warn!(error = %self, code = self.error_code(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.public_message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
