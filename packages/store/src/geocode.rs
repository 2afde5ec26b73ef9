//! Reverse-geocoding results and the per-field resolvers that turn them into
//! address form values.
//!
//! Each resolver walks its own priority list of Nominatim address components
//! and returns the first non-blank one. `None` means "leave the field alone".

use serde::{Deserialize, Serialize};

/// The subset of a Nominatim `jsonv2` reverse response the address form reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResult {
    pub display_name: String,
    pub address: GeocodeAddress,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeAddress {
    pub house_number: Option<String>,
    pub building: Option<String>,
    pub amenity: Option<String>,
    pub road: Option<String>,
    pub pedestrian: Option<String>,
    pub suburb: Option<String>,
    pub landmark: Option<String>,
    pub place_of_worship: Option<String>,
    pub neighbourhood: Option<String>,
    pub village: Option<String>,
    pub town: Option<String>,
    pub city_district: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

fn first_of<'a>(candidates: impl IntoIterator<Item = &'a Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .cloned()
}

pub fn house_number(result: &GeocodeResult) -> Option<String> {
    let a = &result.address;
    first_of([&a.house_number, &a.building, &a.amenity]).or_else(|| {
        result
            .display_name
            .split(',')
            .next()
            .map(str::to_string)
            .filter(|s| !s.trim().is_empty())
    })
}

pub fn street(result: &GeocodeResult) -> Option<String> {
    let a = &result.address;
    first_of([&a.road, &a.pedestrian, &a.suburb])
}

pub fn landmark(result: &GeocodeResult) -> Option<String> {
    let a = &result.address;
    first_of([&a.landmark, &a.amenity, &a.place_of_worship])
}

pub fn area(result: &GeocodeResult) -> Option<String> {
    let a = &result.address;
    first_of([
        &a.suburb,
        &a.neighbourhood,
        &a.village,
        &a.town,
        &a.city_district,
        &a.city,
    ])
}

pub fn city(result: &GeocodeResult) -> Option<String> {
    let a = &result.address;
    first_of([&a.city, &a.town, &a.village, &a.county])
}

pub fn state(result: &GeocodeResult) -> Option<String> {
    first_of([&result.address.state])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeocodeResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_nominatim_response() {
        let result = parse(
            r#"{
                "place_id": 1,
                "display_name": "Infocity, Sector 7, Gandhinagar, Gujarat, India",
                "address": {
                    "amenity": "Infocity",
                    "road": "Sector 7 Road",
                    "suburb": "Sector 7",
                    "city": "Gandhinagar",
                    "state": "Gujarat",
                    "country": "India"
                }
            }"#,
        );
        assert_eq!(house_number(&result).as_deref(), Some("Infocity"));
        assert_eq!(street(&result).as_deref(), Some("Sector 7 Road"));
        assert_eq!(landmark(&result).as_deref(), Some("Infocity"));
        assert_eq!(area(&result).as_deref(), Some("Sector 7"));
        assert_eq!(city(&result).as_deref(), Some("Gandhinagar"));
        assert_eq!(state(&result).as_deref(), Some("Gujarat"));
    }

    #[test]
    fn test_house_number_falls_back_to_display_name() {
        let result = parse(r#"{ "display_name": "42, Some Lane, Town" }"#);
        assert_eq!(house_number(&result).as_deref(), Some("42"));
    }

    #[test]
    fn test_priority_order() {
        let result = parse(
            r#"{ "address": { "pedestrian": "Walkway", "suburb": "Sub", "town": "Kalol", "county": "District" } }"#,
        );
        assert_eq!(street(&result).as_deref(), Some("Walkway"));
        assert_eq!(area(&result).as_deref(), Some("Sub"));
        assert_eq!(city(&result).as_deref(), Some("Kalol"));
    }

    #[test]
    fn test_unresolved_fields_are_none() {
        let result = GeocodeResult::default();
        assert!(house_number(&result).is_none());
        assert!(street(&result).is_none());
        assert!(landmark(&result).is_none());
        assert!(area(&result).is_none());
        assert!(city(&result).is_none());
        assert!(state(&result).is_none());
    }

    #[test]
    fn test_blank_components_are_skipped() {
        let result = parse(r#"{ "address": { "road": "  ", "pedestrian": "Lane" } }"#);
        assert_eq!(street(&result).as_deref(), Some("Lane"));
    }
}
