use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical API category accepted by the spreadsheet functions.
///
/// Each category maps to one family of endpoints on the emissions API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiCategory {
    Location,
    Mobile,
    Fugitive,
    Stationary,
    Calculation,
    TransportationAndDistribution,
    Factor,
}

impl ApiCategory {
    /// Every accepted category, in the order they are listed to users.
    pub const ALL: [ApiCategory; 7] = [
        ApiCategory::Location,
        ApiCategory::Mobile,
        ApiCategory::Fugitive,
        ApiCategory::Stationary,
        ApiCategory::Calculation,
        ApiCategory::TransportationAndDistribution,
        ApiCategory::Factor,
    ];

    /// Normalized (lowercase) name as typed by users.
    pub const fn as_str(self) -> &'static str {
        match self {
            ApiCategory::Location => "location",
            ApiCategory::Mobile => "mobile",
            ApiCategory::Fugitive => "fugitive",
            ApiCategory::Stationary => "stationary",
            ApiCategory::Calculation => "calculation",
            ApiCategory::TransportationAndDistribution => "transportationanddistribution",
            ApiCategory::Factor => "factor",
        }
    }

    /// URL path segment of the category's endpoints.
    pub const fn path_segment(self) -> &'static str {
        match self {
            ApiCategory::TransportationAndDistribution => "transportation_and_distribution",
            other => other.as_str(),
        }
    }

    /// Trim + case-fold `input` and match it against [`ApiCategory::ALL`].
    pub fn parse(input: &str) -> Result<Self, InvalidCategory> {
        let normalized = input.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| InvalidCategory {
                input: input.to_string(),
            })
    }
}

impl fmt::Display for ApiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiCategory {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalize a user-supplied category name, returning its lowercase form.
pub fn validate_category(input: &str) -> Result<&'static str, InvalidCategory> {
    ApiCategory::parse(input).map(ApiCategory::as_str)
}

/// A category name that is not one of [`ApiCategory::ALL`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Invalid API type '{input}'. Valid types are: {}", valid_category_list())]
pub struct InvalidCategory {
    pub input: String,
}

fn valid_category_list() -> String {
    ApiCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        for category in ApiCategory::ALL {
            let shouty = format!("  {}\t", category.as_str().to_uppercase());
            assert_eq!(ApiCategory::parse(&shouty), Ok(category));
            assert_eq!(validate_category(&shouty), Ok(category.as_str()));
        }
        assert_eq!(
            validate_category("TransportationAndDistribution"),
            Ok("transportationanddistribution")
        );
    }

    #[test]
    fn invalid_category_lists_every_valid_name() {
        let err = ApiCategory::parse("scope3").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'scope3'"), "unexpected message: {msg}");
        for category in ApiCategory::ALL {
            assert!(msg.contains(category.as_str()), "missing {category} in: {msg}");
        }
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(ApiCategory::parse("   ").is_err());
    }

    #[test]
    fn path_segments() {
        assert_eq!(
            ApiCategory::TransportationAndDistribution.path_segment(),
            "transportation_and_distribution"
        );
        assert_eq!(ApiCategory::Mobile.path_segment(), "mobile");
    }
}
