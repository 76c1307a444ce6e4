use async_trait::async_trait;
use envizi_model::{AddressParseError, ListValidation, WorkbookError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("invalid cell address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressParseError,
    },
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    #[error("{0}")]
    Other(String),
}

/// The part of the host spreadsheet the lookup functions write to.
#[async_trait]
pub trait ValidationHost: Send + Sync {
    /// Clear any rule on the cell at `address` (`A1` or `Sheet!A1`) and
    /// attach `rule`.
    async fn apply_list_validation(&self, address: &str, rule: ListValidation)
        -> Result<(), HostError>;
}
