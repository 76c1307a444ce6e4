use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::service::{ClientError, MetadataService, Result};
use crate::{ApiCategory, AreaResponse, TypesResponse, UnitsResponse};

/// Credentials issued for the emissions API.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub api_key: String,
    pub tenant_id: String,
    pub client_id: String,
    #[serde(default)]
    pub org_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("org_id", &self.org_id)
            .finish()
    }
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty()
            && !self.tenant_id.trim().is_empty()
            && !self.client_id.trim().is_empty()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpClientConfig {
    /// Root of the API, e.g. `https://api.example.com/v1/`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves it to the transport.
    #[serde(default, with = "optional_millis")]
    pub timeout: Option<Duration>,
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// [`MetadataService`] over HTTPS.
///
/// Endpoints, relative to `base_url`:
/// - `GET {category}/types`
/// - `GET {category}/area`
/// - `GET {category}/units?type={type}`
#[derive(Clone, Debug)]
pub struct HttpMetadataClient {
    client: reqwest::Client,
    base: Url,
    credentials: Credentials,
}

impl HttpMetadataClient {
    pub fn new(config: &HttpClientConfig, credentials: Credentials) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            // `Url::join` drops the last segment unless the base ends with `/`.
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base}: only http/https allowed"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    fn endpoint(&self, category: ApiCategory, leaf: &str) -> Result<Url> {
        self.base
            .join(&format!("{}/{leaf}", category.path_segment()))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut req = self
            .client
            .get(url)
            .bearer_auth(&self.credentials.api_key)
            .header("X-Tenant-Id", &self.credentials.tenant_id)
            .header("X-Client-Id", &self.credentials.client_id);
        if let Some(org_id) = &self.credentials.org_id {
            req = req.header("X-Org-Id", org_id);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MetadataService for HttpMetadataClient {
    async fn get_types(&self, category: ApiCategory) -> Result<TypesResponse> {
        let url = self.endpoint(category, "types")?;
        self.get_json(url).await
    }

    async fn get_area(&self, category: ApiCategory) -> Result<AreaResponse> {
        let url = self.endpoint(category, "area")?;
        self.get_json(url).await
    }

    async fn get_units(&self, category: ApiCategory, activity_type: &str) -> Result<UnitsResponse> {
        let mut url = self.endpoint(category, "units")?;
        url.query_pairs_mut().append_pair("type", activity_type);
        self.get_json(url).await
    }
}
