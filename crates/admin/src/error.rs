//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flavors_core::CatalogError;
use thiserror::Error;

use crate::images::ImageError;

/// Result type alias for admin operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog store operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Image hosting failed.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// The request body could not be read as a form.
    #[error("Form error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound),
            Self::Image(err) => matches!(err, ImageError::Io(_)),
            Self::Session(_) | Self::Internal(_) => true,
            Self::Multipart(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Multipart(err) => err.status(),
            Self::Catalog(CatalogError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Image(ImageError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Image(ImageError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Image(ImageError::Empty) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Catalog(_) | Self::Image(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}
