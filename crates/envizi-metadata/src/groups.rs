//! Static mapping from the seven user-facing categories to the storage
//! buckets of the two cached datasets.
//!
//! Area data is fetched for two representative groups only; every category
//! reads the snapshot of its group. Types are stored per category, except that
//! `factor` reads the `calculation` column.

use envizi_client::ApiCategory;

/// Representative group under which area rows are stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AreaGroup {
    Calculation,
    Mobile,
}

impl AreaGroup {
    pub const ALL: [AreaGroup; 2] = [AreaGroup::Calculation, AreaGroup::Mobile];

    pub const fn as_str(self) -> &'static str {
        match self {
            AreaGroup::Calculation => "calculation",
            AreaGroup::Mobile => "mobile",
        }
    }

    /// Category whose area endpoint is queried for this group.
    pub const fn representative(self) -> ApiCategory {
        match self {
            AreaGroup::Calculation => ApiCategory::Calculation,
            AreaGroup::Mobile => ApiCategory::Mobile,
        }
    }

    pub const fn for_category(category: ApiCategory) -> Self {
        match category {
            ApiCategory::Mobile => AreaGroup::Mobile,
            ApiCategory::Location
            | ApiCategory::Fugitive
            | ApiCategory::Stationary
            | ApiCategory::Calculation
            | ApiCategory::TransportationAndDistribution
            | ApiCategory::Factor => AreaGroup::Calculation,
        }
    }
}

/// Column of the types dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypesColumn {
    Location,
    Mobile,
    Fugitive,
    Stationary,
    Calculation,
    TransportationAndDistribution,
}

impl TypesColumn {
    /// Stored columns, left to right.
    pub const ALL: [TypesColumn; 6] = [
        TypesColumn::Location,
        TypesColumn::Mobile,
        TypesColumn::Fugitive,
        TypesColumn::Stationary,
        TypesColumn::Calculation,
        TypesColumn::TransportationAndDistribution,
    ];

    /// Header cell text.
    pub const fn header(self) -> &'static str {
        match self {
            TypesColumn::Location => "Location",
            TypesColumn::Mobile => "Mobile",
            TypesColumn::Fugitive => "Fugitive",
            TypesColumn::Stationary => "Stationary",
            TypesColumn::Calculation => "Calculation",
            TypesColumn::TransportationAndDistribution => "TransportationAndDistribution",
        }
    }

    pub const fn category(self) -> ApiCategory {
        match self {
            TypesColumn::Location => ApiCategory::Location,
            TypesColumn::Mobile => ApiCategory::Mobile,
            TypesColumn::Fugitive => ApiCategory::Fugitive,
            TypesColumn::Stationary => ApiCategory::Stationary,
            TypesColumn::Calculation => ApiCategory::Calculation,
            TypesColumn::TransportationAndDistribution => {
                ApiCategory::TransportationAndDistribution
            }
        }
    }

    pub const fn for_category(category: ApiCategory) -> Self {
        match category {
            ApiCategory::Location => TypesColumn::Location,
            ApiCategory::Mobile => TypesColumn::Mobile,
            ApiCategory::Fugitive => TypesColumn::Fugitive,
            ApiCategory::Stationary => TypesColumn::Stationary,
            ApiCategory::Calculation | ApiCategory::Factor => TypesColumn::Calculation,
            ApiCategory::TransportationAndDistribution => {
                TypesColumn::TransportationAndDistribution
            }
        }
    }

    /// Position in [`TypesColumn::ALL`]; variants are declared in that order.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mobile_maps_to_the_mobile_group() {
        for category in ApiCategory::ALL {
            let expected = if category == ApiCategory::Mobile {
                AreaGroup::Mobile
            } else {
                AreaGroup::Calculation
            };
            assert_eq!(AreaGroup::for_category(category), expected, "{category}");
        }
    }

    #[test]
    fn factor_aliases_calculation() {
        assert_eq!(
            TypesColumn::for_category(ApiCategory::Factor),
            TypesColumn::for_category(ApiCategory::Calculation)
        );
        assert_eq!(
            AreaGroup::for_category(ApiCategory::Factor),
            AreaGroup::for_category(ApiCategory::Calculation)
        );
    }

    #[test]
    fn every_stored_column_round_trips_through_its_category() {
        for (i, column) in TypesColumn::ALL.into_iter().enumerate() {
            assert_eq!(TypesColumn::for_category(column.category()), column);
            assert_eq!(column.index(), i);
        }
    }
}
