use std::sync::Arc;
use std::time::Duration;

use envizi_client::MetadataService;

use crate::clock::{Clock, SystemClock};
use crate::populate::{fetch_area_table, fetch_types_table};
use crate::staleness::{age, RefreshMode, StalenessPolicy};
use crate::store::{StoreError, Table, TableStore};
use crate::{CacheError, MetadataCacheConfig, TimestampMs};

/// The two cached datasets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Per-category type columns.
    Types,
    /// Countries with state/province and power-grid lists, per area group.
    Area,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Types, DatasetKind::Area];
}

/// What a call to [`MetadataCache::ensure_fresh`] or [`MetadataCache::refresh`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The dataset did not exist and was created.
    Populated { written_at: TimestampMs },
    /// The dataset existed and was recreated.
    Refreshed { written_at: TimestampMs },
    /// The dataset existed and was left alone.
    Fresh,
}

/// Diagnostic view of one dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Absent,
    Fresh { age: Duration },
    /// `age` is `None` when the timestamp marker is missing.
    Stale { age: Option<Duration> },
}

/// Staleness-aware cache of API metadata over a [`TableStore`].
///
/// Population is not locked. Two lookups that both see a stale dataset both
/// re-fetch it and the last write wins. Each population replaces the table
/// wholesale, so rows from different runs are never mixed.
pub struct MetadataCache {
    store: Arc<dyn TableStore>,
    clock: Arc<dyn Clock>,
    policy: StalenessPolicy,
    config: MetadataCacheConfig,
}

impl MetadataCache {
    pub fn new(store: Arc<dyn TableStore>, config: MetadataCacheConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    pub fn with_clock(
        store: Arc<dyn TableStore>,
        clock: Arc<dyn Clock>,
        config: MetadataCacheConfig,
    ) -> Self {
        Self {
            store,
            clock,
            policy: StalenessPolicy::new(config.refresh_interval),
            config,
        }
    }

    pub fn config(&self) -> &MetadataCacheConfig {
        &self.config
    }

    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    fn table_name(&self, kind: DatasetKind) -> &str {
        self.config.table_name(kind)
    }

    /// Make sure `kind` exists and is fresh, populating at most once.
    pub async fn ensure_fresh(
        &self,
        kind: DatasetKind,
        service: &dyn MetadataService,
    ) -> Result<RefreshOutcome, CacheError> {
        if !self.store.exists(self.table_name(kind)).await? {
            let written_at = self.populate(kind, service).await?;
            return Ok(RefreshOutcome::Populated { written_at });
        }
        self.refresh(kind, RefreshMode::IfStale, service).await
    }

    /// Recreate `kind` if `mode` says so.
    ///
    /// With [`RefreshMode::IfStale`], a dataset that cannot be inspected is
    /// treated as stale.
    pub async fn refresh(
        &self,
        kind: DatasetKind,
        mode: RefreshMode,
        service: &dyn MetadataService,
    ) -> Result<RefreshOutcome, CacheError> {
        if mode == RefreshMode::IfStale && !self.is_stale(kind).await {
            return Ok(RefreshOutcome::Fresh);
        }
        log::debug!("refreshing {} ({mode:?})", self.table_name(kind));
        let written_at = self.populate(kind, service).await?;
        Ok(RefreshOutcome::Refreshed { written_at })
    }

    /// Force-refresh every dataset that currently exists. Used after login.
    ///
    /// Every dataset is attempted; the first failure is returned after all
    /// attempts finish.
    pub async fn refresh_existing(
        &self,
        service: &dyn MetadataService,
    ) -> Result<Vec<DatasetKind>, CacheError> {
        let mut refreshed = Vec::new();
        let mut first_err = None;
        for kind in DatasetKind::ALL {
            let result = match self.store.exists(self.table_name(kind)).await {
                Ok(false) => continue,
                Ok(true) => self.refresh(kind, RefreshMode::Always, service).await,
                Err(err) => Err(err.into()),
            };
            match result {
                Ok(_) => refreshed.push(kind),
                Err(err) => {
                    log::warn!("failed to refresh {} after login: {err}", self.table_name(kind));
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(refreshed),
        }
    }

    async fn is_stale(&self, kind: DatasetKind) -> bool {
        let name = self.table_name(kind);
        match self.store.read_all(name).await {
            Ok(Some(stored)) => self.policy.is_stale(stored.written_at, self.clock.now_ms()),
            Ok(None) => true,
            Err(err) => {
                log::warn!("could not inspect {name}, treating it as stale: {err}");
                true
            }
        }
    }

    async fn populate(
        &self,
        kind: DatasetKind,
        service: &dyn MetadataService,
    ) -> Result<TimestampMs, StoreError> {
        let table = match kind {
            DatasetKind::Types => fetch_types_table(service).await,
            DatasetKind::Area => fetch_area_table(service).await,
        };
        let written_at = self.clock.now_ms();
        let name = self.table_name(kind);
        self.store.replace_all(name, table, written_at).await?;
        log::debug!("populated {name} at {written_at}");
        Ok(written_at)
    }

    /// Current rows of `kind`. An absent dataset reads as an empty table.
    pub async fn read(&self, kind: DatasetKind) -> Result<Table, CacheError> {
        let stored = self.store.read_all(self.table_name(kind)).await?;
        Ok(stored.map(|s| s.table).unwrap_or_default())
    }

    pub async fn status(&self, kind: DatasetKind) -> Result<CacheStatus, CacheError> {
        let Some(stored) = self.store.read_all(self.table_name(kind)).await? else {
            return Ok(CacheStatus::Absent);
        };
        let now = self.clock.now_ms();
        let age = stored.written_at.map(|w| age(w, now));
        Ok(match (self.policy.is_stale(stored.written_at, now), age) {
            (false, Some(age)) => CacheStatus::Fresh { age },
            (_, age) => CacheStatus::Stale { age },
        })
    }

    /// Delete both datasets; the next lookup repopulates.
    pub async fn clear(&self) -> Result<(), CacheError> {
        for kind in DatasetKind::ALL {
            self.store.delete(self.table_name(kind)).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish()
    }
}
