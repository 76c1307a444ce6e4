//! Response payloads of the metadata endpoints.
//!
//! Only the fields the add-in reads are modelled; anything else in the JSON is
//! ignored.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypesResponse {
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaResponse {
    #[serde(default)]
    pub locations: Vec<AreaLocation>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLocation {
    pub alpha3: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_provinces: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_grids: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsResponse {
    #[serde(default)]
    pub units: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_location_optional_lists() {
        let json = r#"{
            "locations": [
                {"alpha3": "USA", "countryName": "United States", "stateProvinces": ["Texas"], "extra": 1},
                {"alpha3": "CAN"}
            ]
        }"#;
        let area: AreaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(area.locations.len(), 2);
        assert_eq!(area.locations[0].state_provinces.as_deref(), Some(&["Texas".to_string()][..]));
        assert_eq!(area.locations[0].power_grids, None);
        assert_eq!(area.locations[1].country_name, "");
    }

    #[test]
    fn missing_list_field_defaults_to_empty() {
        let types: TypesResponse = serde_json::from_str("{}").unwrap();
        assert!(types.types.is_empty());
    }
}
