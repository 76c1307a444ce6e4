//! Metadata cache and dropdown lookup functions for the emissions add-in.
//!
//! API metadata (activity types per category, countries with their
//! states/provinces and power grids) is cached in hidden worksheets and
//! re-fetched once older than the configured refresh interval. The lookup
//! functions in [`MetadataFunctions`] read the cache and attach the derived
//! option list to the invoking cell as a list validation rule.
//!
//! The pieces:
//! - [`StalenessPolicy`] decides when a dataset is too old.
//! - [`MetadataCache`] owns population and refresh over a [`TableStore`].
//! - [`lookup`] derives option lists from the cached [`Table`]s.
//! - [`WorkbookHost`] stores tables and validation rules in a [`envizi_model::Workbook`].

mod cache;
mod clock;
mod config;
mod error;
mod functions;
mod groups;
mod host;
pub mod lookup;
mod populate;
mod staleness;
mod store;
mod workbook_host;

pub use cache::{CacheStatus, DatasetKind, MetadataCache, RefreshOutcome};
pub use clock::{Clock, ManualClock, SystemClock, TimestampMs};
pub use config::{MetadataCacheConfig, DEFAULT_REFRESH_INTERVAL};
pub use error::{CacheError, FunctionError};
pub use functions::MetadataFunctions;
pub use groups::{AreaGroup, TypesColumn};
pub use host::{HostError, ValidationHost};
pub use populate::{fetch_area_table, fetch_types_table};
pub use staleness::{age, RefreshMode, StalenessPolicy};
pub use store::{InMemoryTableStore, StoreError, StoredTable, Table, TableStore};
pub use workbook_host::{WorkbookHost, TIMESTAMP_LABEL};
