use async_trait::async_trait;
use thiserror::Error;

use crate::{ApiCategory, AreaResponse, TypesResponse, UnitsResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// Failure reported by a non-HTTP implementation (test doubles, bridges).
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The emissions API's metadata endpoints.
///
/// Implementations must be cheap to share (`Arc<dyn MetadataService>`); the
/// metadata cache fans out one request per category concurrently.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Activity types accepted by `category`.
    async fn get_types(&self, category: ApiCategory) -> Result<TypesResponse>;

    /// Countries/areas with their state/province and power-grid sub-lists.
    async fn get_area(&self, category: ApiCategory) -> Result<AreaResponse>;

    /// Units valid for `activity_type` in `category`.
    async fn get_units(&self, category: ApiCategory, activity_type: &str) -> Result<UnitsResponse>;
}
