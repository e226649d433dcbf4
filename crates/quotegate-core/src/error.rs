use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors for symbols and price data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("symbol '{symbol}' is not supported")]
    SymbolNotSupported { symbol: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("duplicate price point for {date}")]
    DuplicateDate { date: String },
}

/// Provider-level failures, propagated unchanged through the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider throttled the request: {notice}")]
    RateLimited { notice: String },

    #[error("no daily series available for '{symbol}'")]
    NotFound {
        symbol: String,
        message: Option<String>,
    },

    /// `index` counts entries in ascending date order, not payload order.
    #[error("malformed price entry #{index} ({date}): {reason}")]
    MalformedEntry {
        index: usize,
        date: String,
        reason: String,
    },

    #[error("provider payload could not be decoded: {0}")]
    MalformedPayload(String),

    #[error("provider transport failure: {0}")]
    Transport(String),
}

impl ProviderError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedEntry { .. } | Self::MalformedPayload(_) => {
                ErrorKind::MalformedResponse
            }
            Self::Transport(_) => ErrorKind::TransientNetworkFailure,
        }
    }
}

/// Errors returned by [`crate::StockPipeline::get_series`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(#[source] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl PipelineError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSymbol(_) => ErrorKind::InvalidSymbol,
            Self::Provider(error) => error.kind(),
        }
    }
}

/// Failure inside the usage tracker. Never surfaced to callers of the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("usage store lock is poisoned")]
    Poisoned,
}

/// Stable classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSymbol,
    RateLimited,
    NotFound,
    MalformedResponse,
    TransientNetworkFailure,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSymbol => "invalid_symbol",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::MalformedResponse => "malformed_response",
            Self::TransientNetworkFailure => "transient_network_failure",
        }
    }

    /// Client errors carry their own message; the rest are reported generically.
    pub const fn is_client_facing(self) -> bool {
        matches!(self, Self::InvalidSymbol | Self::RateLimited | Self::NotFound)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_kinds() {
        let throttled = ProviderError::RateLimited {
            notice: String::from("slow down"),
        };
        assert_eq!(throttled.kind(), ErrorKind::RateLimited);

        let malformed = ProviderError::MalformedEntry {
            index: 2,
            date: String::from("2024-01-04"),
            reason: String::from("close is not numeric"),
        };
        assert_eq!(malformed.kind(), ErrorKind::MalformedResponse);
        assert_eq!(
            malformed.to_string(),
            "malformed price entry #2 (2024-01-04): close is not numeric"
        );

        let transport = ProviderError::Transport(String::from("connection reset"));
        assert_eq!(transport.kind(), ErrorKind::TransientNetworkFailure);
    }

    #[test]
    fn pipeline_error_keeps_provider_kind() {
        let error = PipelineError::from(ProviderError::NotFound {
            symbol: String::from("AAPL"),
            message: None,
        });
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let invalid = PipelineError::InvalidSymbol(ValidationError::EmptySymbol);
        assert_eq!(invalid.kind(), ErrorKind::InvalidSymbol);
        assert!(invalid.kind().is_client_facing());
        assert!(!ErrorKind::MalformedResponse.is_client_facing());
    }
}
