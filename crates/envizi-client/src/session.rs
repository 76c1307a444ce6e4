use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{Credentials, HttpClientConfig, HttpMetadataClient};
use crate::service::{ClientError, MetadataService};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not logged in; please log in before using this function")]
    NotAuthenticated,
    #[error("credentials are incomplete: api key, tenant id and client id are required")]
    IncompleteCredentials,
    #[error("failed to open session: {0}")]
    Client(#[from] ClientError),
}

/// Supplies an authenticated metadata client.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the current client, or [`SessionError::NotAuthenticated`].
    async fn ensure_session(&self) -> Result<Arc<dyn MetadataService>, SessionError>;
}

/// Builds a client for a set of credentials.
///
/// Kept separate from [`SessionManager`] so tests can log in against an
/// in-process service.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn MetadataService>, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpClientFactory {
    config: HttpClientConfig,
}

impl HttpClientFactory {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for HttpClientFactory {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn MetadataService>, ClientError> {
        let client = HttpMetadataClient::new(&self.config, credentials.clone())?;
        Ok(Arc::new(client))
    }
}

struct Session {
    client: Arc<dyn MetadataService>,
    tenant_id: String,
}

/// Owns the (at most one) active API session.
///
/// `login` replaces any previous session; `logout` drops it. Lookups call
/// [`SessionProvider::ensure_session`] and fail fast when nobody is logged in.
pub struct SessionManager {
    factory: Arc<dyn ClientFactory>,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            session: RwLock::new(None),
        }
    }

    pub fn with_http(config: HttpClientConfig) -> Self {
        Self::new(Arc::new(HttpClientFactory::new(config)))
    }

    pub fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        if !credentials.is_complete() {
            return Err(SessionError::IncompleteCredentials);
        }
        let client = self.factory.connect(credentials)?;
        let mut session = self.session.write().expect("session lock poisoned");
        *session = Some(Session {
            client,
            tenant_id: credentials.tenant_id.clone(),
        });
        log::info!("opened emissions API session for tenant {}", credentials.tenant_id);
        Ok(())
    }

    pub fn logout(&self) {
        let previous = self.session.write().expect("session lock poisoned").take();
        if let Some(previous) = previous {
            log::info!("closed emissions API session for tenant {}", previous.tenant_id);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[async_trait]
impl SessionProvider for SessionManager {
    async fn ensure_session(&self) -> Result<Arc<dyn MetadataService>, SessionError> {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| Arc::clone(&s.client))
            .ok_or(SessionError::NotAuthenticated)
    }
}
