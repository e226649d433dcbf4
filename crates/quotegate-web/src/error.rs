use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quotegate_core::{ErrorKind, PipelineError, UsageError};
use thiserror::Error;
use tracing::error;

use crate::envelope::ErrorEnvelope;

/// Handler-level failures rendered as an [`ErrorEnvelope`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("request task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Pipeline(error) => Some(error.kind()),
            Self::Usage(_) | Self::Task(_) => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            Some(ErrorKind::InvalidSymbol) => StatusCode::BAD_REQUEST,
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Some(ErrorKind::MalformedResponse | ErrorKind::TransientNetworkFailure) | None => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self.kind() {
            Some(kind) if kind.is_client_facing() => ErrorEnvelope::new(kind, self.to_string()),
            kind => {
                error!(%status, error = %self, "request failed");
                ErrorEnvelope::with_code(
                    kind.map_or("internal", ErrorKind::as_str),
                    "failed to fetch stock data",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Startup and serve failures of the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Address { .. } => 2,
            Self::Io(_) => 10,
        }
    }
}
