//! Fetch-and-transform halves of the two population routines.
//!
//! Requests fan out concurrently. A category that fails (transport error,
//! bad status, undecodable body) contributes an empty result and a warning;
//! it never aborts the others.

use envizi_client::{AreaLocation, MetadataService};
use futures_util::future::join_all;

use crate::groups::{AreaGroup, TypesColumn};
use crate::lookup::{join_list, AREA_COLUMNS};
use crate::store::Table;

fn clean(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Build the types table: one column per [`TypesColumn`], padded with empty
/// cells to the longest column.
pub async fn fetch_types_table(service: &dyn MetadataService) -> Table {
    let fetches = TypesColumn::ALL.map(|column| async move {
        match service.get_types(column.category()).await {
            Ok(response) => clean(response.types),
            Err(err) => {
                log::warn!(
                    "failed to fetch types for '{}'; caching an empty column: {err}",
                    column.category()
                );
                Vec::new()
            }
        }
    });
    let columns = join_all(fetches).await;

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..height)
        .map(|i| {
            columns
                .iter()
                .map(|col| col.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    let header = TypesColumn::ALL
        .iter()
        .map(|c| c.header().to_string())
        .collect();
    log::debug!(
        "fetched types: {}",
        TypesColumn::ALL
            .iter()
            .zip(&columns)
            .map(|(c, v)| format!("{}={}", c.header(), v.len()))
            .collect::<Vec<_>>()
            .join(" ")
    );
    Table::new(header, rows)
}

fn area_row(group: AreaGroup, location: AreaLocation) -> Option<Vec<String>> {
    let alpha3 = location.alpha3.trim().to_uppercase();
    if alpha3.is_empty() {
        return None;
    }
    Some(vec![
        group.as_str().to_string(),
        alpha3,
        location.country_name.trim().to_string(),
        join_list(&location.state_provinces.unwrap_or_default()),
        join_list(&location.power_grids.unwrap_or_default()),
    ])
}

/// Build the area table from one request per [`AreaGroup`].
pub async fn fetch_area_table(service: &dyn MetadataService) -> Table {
    let fetches = AreaGroup::ALL.map(|group| async move {
        match service.get_area(group.representative()).await {
            Ok(response) => (group, response.locations),
            Err(err) => {
                log::warn!(
                    "failed to fetch areas for group '{}'; caching no rows: {err}",
                    group.as_str()
                );
                (group, Vec::new())
            }
        }
    });

    let mut rows = Vec::new();
    for (group, locations) in join_all(fetches).await {
        let before = rows.len();
        rows.extend(locations.into_iter().filter_map(|loc| area_row(group, loc)));
        log::debug!("fetched {} areas for group '{}'", rows.len() - before, group.as_str());
    }

    let header = AREA_COLUMNS.iter().map(|c| c.to_string()).collect();
    Table::new(header, rows)
}
