//! User-facing dropdown functions: `TYPES`, `UNITS`, `COUNTRY`,
//! `STATE_PROVINCE` and `POWER_GRID`.
//!
//! Each function returns an empty string; the option list reaches the user as
//! a list validation rule on the invoking cell.

use std::sync::Arc;

use envizi_client::{ApiCategory, SessionProvider};
use envizi_model::ListValidation;

use crate::cache::{DatasetKind, MetadataCache};
use crate::error::{CacheError, FunctionError};
use crate::groups::{AreaGroup, TypesColumn};
use crate::host::ValidationHost;
use crate::lookup;
use crate::store::Table;

const TYPES_PREFIX: &str = "Error fetching types";
const UNITS_PREFIX: &str = "Error fetching units";
const COUNTRY_PREFIX: &str = "Error fetching countries";
const STATE_PROVINCE_PREFIX: &str = "Error fetching states/provinces";
const POWER_GRID_PREFIX: &str = "Error fetching power grids";

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, FunctionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FunctionError::InvalidValue(format!("A {what} is required.")));
    }
    Ok(value)
}

pub struct MetadataFunctions {
    sessions: Arc<dyn SessionProvider>,
    cache: Arc<MetadataCache>,
    host: Arc<dyn ValidationHost>,
}

impl MetadataFunctions {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        cache: Arc<MetadataCache>,
        host: Arc<dyn ValidationHost>,
    ) -> Self {
        Self {
            sessions,
            cache,
            host,
        }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// `TYPES(category)`
    pub async fn types(&self, category: &str, invocation: &str) -> Result<String, FunctionError> {
        let category = ApiCategory::parse(category)?;
        let column = TypesColumn::for_category(category);

        let options = self
            .cached_options(DatasetKind::Types, |table| lookup::types_for(table, column))
            .await
            .map_err(|e| FunctionError::unavailable(TYPES_PREFIX, e))?;
        if options.is_empty() {
            return Err(FunctionError::NotAvailable(format!(
                "No types found for API type '{category}'."
            )));
        }
        self.attach(invocation, options, TYPES_PREFIX).await
    }

    /// `UNITS(category, type)`. Always asks the API; units are not cached.
    pub async fn units(
        &self,
        category: &str,
        activity_type: &str,
        invocation: &str,
    ) -> Result<String, FunctionError> {
        let category = ApiCategory::parse(category)?;
        let activity_type = required(activity_type, "type")?;

        let units = self
            .live_units(category, activity_type)
            .await
            .map_err(|e| FunctionError::unavailable(UNITS_PREFIX, e))?;
        if units.is_empty() {
            return Err(FunctionError::NotAvailable(format!(
                "No units found for type '{activity_type}' in API type '{category}'."
            )));
        }
        self.attach(invocation, units, UNITS_PREFIX).await
    }

    /// `COUNTRY(category)`
    pub async fn country(&self, category: &str, invocation: &str) -> Result<String, FunctionError> {
        let category = ApiCategory::parse(category)?;
        let group = AreaGroup::for_category(category);

        let options = self
            .cached_options(DatasetKind::Area, |table| lookup::countries(table, group))
            .await
            .map_err(|e| FunctionError::unavailable(COUNTRY_PREFIX, e))?;
        if options.is_empty() {
            return Err(FunctionError::NotAvailable(format!(
                "No countries found for API type '{category}'."
            )));
        }
        self.attach(invocation, options, COUNTRY_PREFIX).await
    }

    /// `STATE_PROVINCE(category, country)`
    pub async fn state_province(
        &self,
        category: &str,
        country: &str,
        invocation: &str,
    ) -> Result<String, FunctionError> {
        let category = ApiCategory::parse(category)?;
        let country = required(country, "country code")?.to_uppercase();
        let group = AreaGroup::for_category(category);

        let options = self
            .cached_options(DatasetKind::Area, |table| {
                lookup::state_provinces(table, group, &country)
            })
            .await
            .map_err(|e| FunctionError::unavailable(STATE_PROVINCE_PREFIX, e))?;
        if options.is_empty() {
            return Err(FunctionError::NotAvailable(format!(
                "No states/provinces found for country '{country}' in API type '{category}'."
            )));
        }
        self.attach(invocation, options, STATE_PROVINCE_PREFIX).await
    }

    /// `POWER_GRID(category, country)`
    pub async fn power_grid(
        &self,
        category: &str,
        country: &str,
        invocation: &str,
    ) -> Result<String, FunctionError> {
        let category = ApiCategory::parse(category)?;
        let country = required(country, "country code")?.to_uppercase();
        let group = AreaGroup::for_category(category);

        let options = self
            .cached_options(DatasetKind::Area, |table| {
                lookup::power_grids(table, group, &country)
            })
            .await
            .map_err(|e| FunctionError::unavailable(POWER_GRID_PREFIX, e))?;
        if options.is_empty() {
            return Err(FunctionError::NotAvailable(format!(
                "No power grids found for country '{country}' in API type '{category}'."
            )));
        }
        self.attach(invocation, options, POWER_GRID_PREFIX).await
    }

    /// Force-refresh the datasets that already exist. Call right after a
    /// successful login.
    pub async fn on_login(&self) -> Result<Vec<DatasetKind>, FunctionError> {
        let refreshed = self
            .refresh_after_login()
            .await
            .map_err(|e| FunctionError::unavailable("Error refreshing cached data", e))?;
        log::info!("refreshed {} cached dataset(s) after login", refreshed.len());
        Ok(refreshed)
    }

    async fn refresh_after_login(&self) -> Result<Vec<DatasetKind>, CacheError> {
        let service = self.sessions.ensure_session().await?;
        self.cache.refresh_existing(service.as_ref()).await
    }

    async fn cached_options<F>(&self, kind: DatasetKind, derive: F) -> Result<Vec<String>, CacheError>
    where
        F: FnOnce(&Table) -> Vec<String>,
    {
        let service = self.sessions.ensure_session().await?;
        self.cache.ensure_fresh(kind, service.as_ref()).await?;
        let table = self.cache.read(kind).await?;
        Ok(derive(&table))
    }

    async fn live_units(
        &self,
        category: ApiCategory,
        activity_type: &str,
    ) -> Result<Vec<String>, CacheError> {
        let service = self.sessions.ensure_session().await?;
        let response = service.get_units(category, activity_type).await?;
        Ok(response
            .units
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect())
    }

    async fn attach(
        &self,
        invocation: &str,
        options: Vec<String>,
        prefix: &str,
    ) -> Result<String, FunctionError> {
        let config = self.cache.config();
        let rule = ListValidation::new(options)
            .with_error_alert(config.rejection_title.clone(), config.rejection_message.clone());
        self.host
            .apply_list_validation(invocation, rule)
            .await
            .map_err(|e| FunctionError::unavailable(prefix, CacheError::from(e)))?;
        Ok(String::new())
    }
}

impl std::fmt::Debug for MetadataFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataFunctions")
            .field("cache", &self.cache)
            .finish()
    }
}
