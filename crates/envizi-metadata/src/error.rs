use envizi_client::{ClientError, InvalidCategory, SessionError};
use envizi_model::ErrorValue;
use thiserror::Error;

use crate::host::HostError;
use crate::store::StoreError;

/// Internal failure of a cache or lookup step.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cache store error: {0}")]
    Store(#[from] StoreError),
    #[error("cell access failed: {0}")]
    Host(#[from] HostError),
    #[error("remote service error: {0}")]
    Client(#[from] ClientError),
}

/// Error surfaced to the spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// Bad user input. Rendered as `#VALUE!`.
    #[error("{0}")]
    InvalidValue(String),
    /// Nothing to show: no session, remote or host failure, empty result.
    /// Rendered as `#N/A`.
    #[error("{0}")]
    NotAvailable(String),
}

impl FunctionError {
    pub fn error_value(&self) -> ErrorValue {
        match self {
            FunctionError::InvalidValue(_) => ErrorValue::Value,
            FunctionError::NotAvailable(_) => ErrorValue::NA,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FunctionError::InvalidValue(msg) | FunctionError::NotAvailable(msg) => msg,
        }
    }

    /// Wrap an unexpected failure under a stable, lookup-specific prefix.
    pub(crate) fn unavailable(prefix: &str, err: impl std::fmt::Display) -> Self {
        FunctionError::NotAvailable(format!("{prefix}: {err}"))
    }
}

impl From<InvalidCategory> for FunctionError {
    fn from(err: InvalidCategory) -> Self {
        FunctionError::InvalidValue(err.to_string())
    }
}
