//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built; clients only ever see
//! the error category as `{"error": "..."}`.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::chain::{PipelineError, ReadError};

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// A write failed somewhere in the pipeline.
    #[error(transparent)]
    Write(#[from] PipelineError),

    /// A query failed or found nothing.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Malformed JSON body.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Malformed path parameters.
    #[error("Invalid path parameters: {0}")]
    Path(#[from] PathRejection),
}

impl AppError {
    /// Whether this error is the gateway's fault or the chain's, not the caller's.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Write(err) => matches!(
                err,
                PipelineError::Signer(_)
                    | PipelineError::Network(_)
                    | PipelineError::Precheck(_)
                    | PipelineError::Rejected(_)
                    | PipelineError::Reverted { .. }
                    | PipelineError::ConfirmationTimeout { .. }
                    | PipelineError::Confirmation { .. }
            ),
            Self::Read(err) => matches!(err, ReadError::Query(_)),
            Self::Body(_) | Self::Path(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Write(PipelineError::Unauthorized { .. }) => StatusCode::FORBIDDEN,
            Self::Read(ReadError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ if self.is_server_error() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// The message shown to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Write(err) => match err {
                PipelineError::Unauthorized { .. } => "Unauthorized access".to_string(),
                PipelineError::Validation(_) => "Invalid or missing metadata".to_string(),
                PipelineError::Conflict(message) => (*message).to_string(),
                PipelineError::Precondition(message) => message.clone(),
                PipelineError::Encoding(_) => "Invalid request parameters".to_string(),
                PipelineError::Signer(_) => "Internal server error".to_string(),
                PipelineError::Network(_) => "Network error".to_string(),
                PipelineError::Precheck(_) => "Internal server error".to_string(),
                PipelineError::Rejected(_) => "Transaction rejected".to_string(),
                PipelineError::Reverted { .. } => "Transaction reverted".to_string(),
                PipelineError::ConfirmationTimeout { .. } => {
                    "Transaction not confirmed in time".to_string()
                }
                PipelineError::Confirmation { .. } => {
                    "Transaction confirmation failed".to_string()
                }
            },
            Self::Read(ReadError::NotFound(entity)) => entity.not_found_message().to_string(),
            Self::Read(ReadError::Query(_)) => "Internal server error".to_string(),
            Self::Body(_) | Self::Path(_) => "Invalid request parameters".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status = self.status();
        let message = self.public_message();

        // Callers need the hash to re-check an ambiguous outcome.
        let body = match &self {
            Self::Write(err) => match err.tx_hash() {
                Some(tx_hash) => json!({ "error": message, "transactionHash": tx_hash }),
                None => json!({ "error": message }),
            },
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// `Json` extractor whose rejections become [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections become [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
