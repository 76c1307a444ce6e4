#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use envizi_client::{
    ApiCategory, AreaLocation, AreaResponse, ClientError, MetadataService, SessionError,
    SessionProvider, TypesResponse, UnitsResponse,
};
use envizi_metadata::{
    InMemoryTableStore, StoreError, StoredTable, Table, TableStore, TimestampMs,
};

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const T0: TimestampMs = 1_700_000_000_000;

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn location(alpha3: &str, name: &str, states: &[&str], grids: &[&str]) -> AreaLocation {
    AreaLocation {
        alpha3: alpha3.to_string(),
        country_name: name.to_string(),
        state_provinces: Some(strings(states)),
        power_grids: Some(strings(grids)),
    }
}

/// In-process metadata service with per-endpoint call counters.
#[derive(Default)]
pub struct FakeService {
    types: Mutex<HashMap<ApiCategory, Vec<String>>>,
    areas: Mutex<HashMap<ApiCategory, Vec<AreaLocation>>>,
    units: Mutex<HashMap<(ApiCategory, String), Vec<String>>>,
    failing: Mutex<HashSet<ApiCategory>>,
    pub types_calls: AtomicUsize,
    pub area_calls: AtomicUsize,
    pub units_calls: AtomicUsize,
    pub area_categories: Mutex<Vec<ApiCategory>>,
}

impl FakeService {
    /// A service with a small, realistic data set.
    pub fn sample() -> Self {
        let service = Self::default();
        service.set_types(ApiCategory::Location, &["Electricity", "District Heating"]);
        service.set_types(ApiCategory::Mobile, &["Diesel", "Petrol", "LPG"]);
        service.set_types(ApiCategory::Fugitive, &["R-134a"]);
        service.set_types(ApiCategory::Stationary, &["Natural Gas", "Coal"]);
        service.set_types(ApiCategory::Calculation, &["Purchased Goods", "Waste"]);
        service.set_types(ApiCategory::TransportationAndDistribution, &["Freight"]);
        service.set_areas(
            ApiCategory::Calculation,
            vec![
                location("USA", "United States", &["California", "Texas", "New York"], &["CAMX", "ERCT"]),
                location("CAN", "Canada", &["Ontario", "Quebec"], &[]),
            ],
        );
        service.set_areas(
            ApiCategory::Mobile,
            vec![
                location("GBR", "United Kingdom", &[], &[]),
                location("usa", "United States", &["Texas"], &[]),
            ],
        );
        service.set_units(ApiCategory::Mobile, "Diesel", &["L", "gal"]);
        service
    }

    pub fn set_types(&self, category: ApiCategory, types: &[&str]) {
        self.types.lock().unwrap().insert(category, strings(types));
    }

    pub fn set_areas(&self, category: ApiCategory, locations: Vec<AreaLocation>) {
        self.areas.lock().unwrap().insert(category, locations);
    }

    pub fn set_units(&self, category: ApiCategory, activity_type: &str, units: &[&str]) {
        self.units
            .lock()
            .unwrap()
            .insert((category, activity_type.to_string()), strings(units));
    }

    pub fn fail(&self, category: ApiCategory) {
        self.failing.lock().unwrap().insert(category);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.types_calls.load(Ordering::SeqCst),
            self.area_calls.load(Ordering::SeqCst),
            self.units_calls.load(Ordering::SeqCst),
        )
    }

    fn check(&self, category: ApiCategory) -> Result<(), ClientError> {
        if self.failing.lock().unwrap().contains(&category) {
            return Err(ClientError::Status {
                status: 503,
                body: format!("{category} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataService for FakeService {
    async fn get_types(&self, category: ApiCategory) -> Result<TypesResponse, ClientError> {
        self.types_calls.fetch_add(1, Ordering::SeqCst);
        self.check(category)?;
        let types = self.types.lock().unwrap().get(&category).cloned().unwrap_or_default();
        Ok(TypesResponse { types })
    }

    async fn get_area(&self, category: ApiCategory) -> Result<AreaResponse, ClientError> {
        self.area_calls.fetch_add(1, Ordering::SeqCst);
        self.area_categories.lock().unwrap().push(category);
        self.check(category)?;
        let locations = self.areas.lock().unwrap().get(&category).cloned().unwrap_or_default();
        Ok(AreaResponse { locations })
    }

    async fn get_units(
        &self,
        category: ApiCategory,
        activity_type: &str,
    ) -> Result<UnitsResponse, ClientError> {
        self.units_calls.fetch_add(1, Ordering::SeqCst);
        self.check(category)?;
        let units = self
            .units
            .lock()
            .unwrap()
            .get(&(category, activity_type.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(UnitsResponse { units })
    }
}

/// Yields to the scheduler before every call, so concurrent lookups
/// interleave at each remote request.
pub struct YieldingService {
    inner: Arc<FakeService>,
}

impl YieldingService {
    pub fn new(inner: Arc<FakeService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MetadataService for YieldingService {
    async fn get_types(&self, category: ApiCategory) -> Result<TypesResponse, ClientError> {
        tokio::task::yield_now().await;
        self.inner.get_types(category).await
    }

    async fn get_area(&self, category: ApiCategory) -> Result<AreaResponse, ClientError> {
        tokio::task::yield_now().await;
        self.inner.get_area(category).await
    }

    async fn get_units(
        &self,
        category: ApiCategory,
        activity_type: &str,
    ) -> Result<UnitsResponse, ClientError> {
        tokio::task::yield_now().await;
        self.inner.get_units(category, activity_type).await
    }
}

/// Session provider that is either logged in with a fixed service or not.
pub struct StaticSession {
    service: Arc<dyn MetadataService>,
    logged_in: AtomicBool,
}

impl StaticSession {
    pub fn logged_in(service: Arc<dyn MetadataService>) -> Self {
        Self {
            service,
            logged_in: AtomicBool::new(true),
        }
    }

    pub fn logged_out(service: Arc<dyn MetadataService>) -> Self {
        Self {
            service,
            logged_in: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn ensure_session(&self) -> Result<Arc<dyn MetadataService>, SessionError> {
        if !self.logged_in.load(Ordering::SeqCst) {
            return Err(SessionError::NotAuthenticated);
        }
        Ok(Arc::clone(&self.service))
    }
}

/// Wraps an [`InMemoryTableStore`], counting calls and optionally failing reads.
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryTableStore,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_reads: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, table: Table, written_at: Option<TimestampMs>) {
        self.inner.seed(name, StoredTable { table, written_at });
    }

    pub fn touched(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStore for CountingStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(name).await
    }

    async fn read_all(&self, name: &str) -> Result<Option<StoredTable>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Host("read refused".to_string()));
        }
        self.inner.read_all(name).await
    }

    async fn replace_all(
        &self,
        name: &str,
        table: Table,
        written_at: TimestampMs,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_all(name, table, written_at).await
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(name).await
    }
}
