//! Option lists derived from the cached tables.
//!
//! These are pure functions over [`Table`]; the caller is responsible for
//! making sure the table is present and fresh.

use crate::groups::{AreaGroup, TypesColumn};
use crate::store::Table;

pub const AREA_GROUP_COLUMN: &str = "apiGroup";
pub const AREA_ALPHA3_COLUMN: &str = "alpha3";
pub const AREA_COUNTRY_NAME_COLUMN: &str = "countryName";
pub const AREA_STATE_PROVINCES_COLUMN: &str = "stateProvinces";
pub const AREA_POWER_GRIDS_COLUMN: &str = "powerGrids";

/// Header of the area dataset, left to right.
pub const AREA_COLUMNS: [&str; 5] = [
    AREA_GROUP_COLUMN,
    AREA_ALPHA3_COLUMN,
    AREA_COUNTRY_NAME_COLUMN,
    AREA_STATE_PROVINCES_COLUMN,
    AREA_POWER_GRIDS_COLUMN,
];

const LIST_SEPARATOR: &str = ", ";

/// Join a sub-list into one cell as `a, b, c`.
///
/// The format is lossy: a name that itself contains a comma comes back from
/// [`split_list`] as two entries.
pub fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

pub fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn area_column(table: &Table, name: &str) -> Option<usize> {
    // Fall back to the fixed layout for tables written without a header.
    table
        .column(name)
        .or_else(|| AREA_COLUMNS.iter().position(|c| *c == name))
}

/// Types recorded for `column`, skipping padding cells.
pub fn types_for(table: &Table, column: TypesColumn) -> Vec<String> {
    let Some(col) = table.column(column.header()).or_else(|| {
        table.header.is_empty().then(|| column.index())
    }) else {
        return Vec::new();
    };

    (0..table.rows.len())
        .map(|row| table.cell(row, col).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn group_rows<'a>(table: &'a Table, group: AreaGroup) -> impl Iterator<Item = usize> + 'a {
    let group_col = area_column(table, AREA_GROUP_COLUMN);
    (0..table.rows.len()).filter(move |&row| {
        group_col.is_some_and(|col| table.cell(row, col).trim().eq_ignore_ascii_case(group.as_str()))
    })
}

/// Distinct alpha-3 codes recorded under `group`, in first-seen order.
pub fn countries(table: &Table, group: AreaGroup) -> Vec<String> {
    let Some(alpha3_col) = area_column(table, AREA_ALPHA3_COLUMN) else {
        return Vec::new();
    };

    let mut out: Vec<String> = Vec::new();
    for row in group_rows(table, group) {
        let code = table.cell(row, alpha3_col).trim();
        if !code.is_empty() && !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}

fn country_sub_list(table: &Table, group: AreaGroup, country: &str, column: &str) -> Vec<String> {
    let (Some(alpha3_col), Some(list_col)) =
        (area_column(table, AREA_ALPHA3_COLUMN), area_column(table, column))
    else {
        return Vec::new();
    };

    let country = country.trim().to_uppercase();
    group_rows(table, group)
        .find(|&row| table.cell(row, alpha3_col).trim() == country)
        .map(|row| split_list(table.cell(row, list_col)))
        .unwrap_or_default()
}

pub fn state_provinces(table: &Table, group: AreaGroup, country: &str) -> Vec<String> {
    country_sub_list(table, group, country, AREA_STATE_PROVINCES_COLUMN)
}

pub fn power_grids(table: &Table, group: AreaGroup, country: &str) -> Vec<String> {
    country_sub_list(table, group, country, AREA_POWER_GRIDS_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn area_table() -> Table {
        Table::new(
            row(&AREA_COLUMNS),
            vec![
                row(&["calculation", "USA", "United States", "California, Texas, New York", "CAMX, ERCT"]),
                row(&["calculation", "CAN", "Canada", "Ontario", ""]),
                row(&["mobile", "GBR", "United Kingdom", "", ""]),
                row(&["mobile", "USA", "United States", "Texas", ""]),
                row(&["mobile", "GBR", "United Kingdom", "", ""]),
            ],
        )
    }

    #[test]
    fn countries_are_distinct_per_group() {
        assert_eq!(countries(&area_table(), AreaGroup::Mobile), vec!["GBR", "USA"]);
        assert_eq!(countries(&area_table(), AreaGroup::Calculation), vec!["USA", "CAN"]);
    }

    #[test]
    fn state_provinces_match_group_and_country() {
        assert_eq!(
            state_provinces(&area_table(), AreaGroup::Calculation, "usa"),
            vec!["California", "Texas", "New York"]
        );
        assert_eq!(
            state_provinces(&area_table(), AreaGroup::Mobile, "USA"),
            vec!["Texas"]
        );
        assert!(state_provinces(&area_table(), AreaGroup::Calculation, "MEX").is_empty());
    }

    #[test]
    fn empty_power_grid_string_is_an_empty_list() {
        assert!(power_grids(&area_table(), AreaGroup::Calculation, "CAN").is_empty());
        assert_eq!(
            power_grids(&area_table(), AreaGroup::Calculation, " usa "),
            vec!["CAMX", "ERCT"]
        );
    }

    #[test]
    fn types_skip_padding_and_honor_header_names() {
        let table = Table::new(
            row(&["Location", "Mobile"]),
            vec![row(&["Electricity", "Diesel"]), row(&["", "Petrol"])],
        );
        assert_eq!(types_for(&table, TypesColumn::Mobile), vec!["Diesel", "Petrol"]);
        assert_eq!(types_for(&table, TypesColumn::Location), vec!["Electricity"]);
        assert!(types_for(&table, TypesColumn::Fugitive).is_empty());
    }

    #[test]
    fn comma_inside_a_name_splits_into_two_entries() {
        let joined = join_list(&row(&["Bonaire, Sint Eustatius and Saba", "Aruba"]));
        assert_eq!(
            split_list(&joined),
            vec!["Bonaire", "Sint Eustatius and Saba", "Aruba"]
        );
    }

    #[test]
    fn list_helpers() {
        assert_eq!(join_list(&row(&[" a ", "", "b"])), "a, b");
        assert_eq!(split_list(" a,, b ,"), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }
}
