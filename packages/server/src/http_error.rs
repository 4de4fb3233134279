//! HTTP error handling
//!
//! Every failed request answers with the same envelope, which
//! `HttpContentStore` decodes on the client side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use coursedesk_core::StoreError;
use serde::{Deserialize, Serialize};

/// Error envelope: `{ message, code, details? }`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// HTTP status for this error's code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "RESOURCE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_ORDER" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => HttpError::new(err.to_string(), "RESOURCE_NOT_FOUND"),
            StoreError::InvalidOrder { ref reason } => {
                HttpError::with_details(err.to_string(), "INVALID_ORDER", reason.clone())
            }
            StoreError::Invalid(_) => HttpError::new(err.to_string(), "VALIDATION_ERROR"),
            StoreError::Rejected { .. }
            | StoreError::Transport(_)
            | StoreError::Decode(_)
            | StoreError::Config(_) => {
                HttpError::with_details(err.to_string(), "STORE_ERROR", format!("{:?}", err))
            }
        }
    }
}
