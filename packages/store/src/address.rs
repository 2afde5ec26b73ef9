//! # Address form state
//!
//! The location dialog edits one [`AddressForm`]. It has two input modes that
//! feed the same fields:
//!
//! - **typed**: the customer fills house number, street, landmark, area, city
//!   and state directly, or picks an area from the dropdown;
//! - **map-picked**: a pin or the device position is reverse-geocoded and the
//!   per-field resolvers in [`crate::geocode`] fill whatever they can.
//!
//! The two are reconciled only by [`AddressForm::payload`], which builds the
//! single record sent to `PATCH /customers/{id}/address`.

use serde::{Deserialize, Serialize};

use crate::geocode::{self, GeocodeResult};
use crate::models::{Area, Customer, CustomerAddress, LatLng, StructuredAddress};

/// The pinned location and its human-readable address.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddressForm {
    pub house_number: String,
    pub street: String,
    pub landmark: String,
    pub area: String,
    pub city: String,
    pub state: String,
    /// Filter for the area dropdown. Follows `area` except right after a
    /// catalogue match on the stored area id.
    pub area_query: String,
    pub map_location: Option<MapLocation>,
    pub map_center: LatLng,
    pub show_map: bool,
    pub submitting: bool,
}

/// Body of `PATCH /customers/{id}/address`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressPayload {
    pub address: StructuredAddress,
    pub area_id: String,
}

impl AddressForm {
    /// An empty form centred on `center`.
    pub fn empty(center: LatLng) -> Self {
        Self {
            house_number: String::new(),
            street: String::new(),
            landmark: String::new(),
            area: String::new(),
            city: String::new(),
            state: String::new(),
            area_query: String::new(),
            map_location: None,
            map_center: center,
            show_map: false,
            submitting: false,
        }
    }

    /// Fill the form from the stored profile.
    pub fn hydrate(customer: Option<&Customer>, areas: &[Area], default_center: LatLng) -> Self {
        let mut form = Self::empty(default_center);
        let Some(customer) = customer else {
            return form;
        };

        let (structured, flat) = match &customer.address {
            Some(CustomerAddress::Structured(addr)) => (Some(addr), addr.typed_address.clone()),
            Some(CustomerAddress::Legacy(text)) => (None, text.clone()),
            None => (None, String::new()),
        };

        match structured.filter(|a| a.has_typed_fields()) {
            Some(addr) => {
                form.house_number = addr.house_number.clone();
                form.street = addr.street.clone();
                form.landmark = addr.landmark.clone();
                form.area = addr.area.clone();
                form.city = addr.city.clone();
                form.state = addr.state.clone();
            }
            None => form.fill_from_flat(&flat),
        }
        form.area_query = form.area.clone();

        if let Some(point) = structured.and_then(StructuredAddress::coordinates) {
            let mapped = structured
                .map(|a| a.mapped_address.as_str())
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(flat.as_str());
            form.map_location = Some(MapLocation {
                lat: point.lat,
                lng: point.lng,
                address: mapped.to_string(),
            });
            form.map_center = point;
        } else if let Some(point) = customer.area.as_ref().and_then(Area::center) {
            form.map_location = Some(MapLocation {
                lat: point.lat,
                lng: point.lng,
                address: flat.clone(),
            });
            form.map_center = point;
        }

        let area_id = customer
            .area_id
            .as_deref()
            .or(structured.map(|a| a.area_id.as_str()))
            .map(str::trim)
            .filter(|id| !id.is_empty());
        if let Some(matched) = area_id.and_then(|id| areas.iter().find(|a| a.id == id)) {
            form.area_query = matched.area_name.clone();
            if form.area.trim().is_empty() {
                form.area = matched.area_name.clone();
            }
            if let Some(center) = matched.center() {
                form.map_center = center;
            }
        }

        form
    }

    /// Split a comma-joined address into the six typed fields by position.
    fn fill_from_flat(&mut self, flat: &str) {
        let mut parts = flat.split(", ").map(str::to_string);
        let mut next = || parts.next().unwrap_or_default();
        self.house_number = next();
        self.street = next();
        self.landmark = next();
        self.area = next();
        self.city = next();
        self.state = next();
    }

    /// Apply a reverse-geocoding result for the point `(lat, lng)`.
    ///
    /// A typed area is kept; every other field is replaced when the result
    /// resolves it.
    pub fn apply_geocode(&mut self, result: &GeocodeResult, lat: f64, lng: f64) {
        if let Some(v) = geocode::house_number(result) {
            self.house_number = v;
        }
        if let Some(v) = geocode::street(result) {
            self.street = v;
        }
        if let Some(v) = geocode::landmark(result) {
            self.landmark = v;
        }
        if self.area.trim().is_empty() {
            if let Some(v) = geocode::area(result) {
                self.set_area_text(v);
            }
        }
        if let Some(v) = geocode::city(result) {
            self.city = v;
        }
        if let Some(v) = geocode::state(result) {
            self.state = v;
        }
        self.map_location = Some(MapLocation {
            lat,
            lng,
            address: result.display_name.clone(),
        });
        self.map_center = LatLng::new(lat, lng);
    }

    /// Text typed into the area field. Also filters the dropdown.
    pub fn set_area_text(&mut self, text: impl Into<String>) {
        self.area = text.into();
        self.area_query = self.area.clone();
    }

    /// Take area, city and state from a catalogue entry.
    pub fn select_area(&mut self, area: &Area) {
        self.set_area_text(area.area_name.clone());
        self.city = area.city_name.clone();
        self.state = area.state_name.clone();
        if let Some(center) = area.center() {
            self.map_center = center;
            if self.show_map {
                self.map_location = Some(MapLocation {
                    lat: center.lat,
                    lng: center.lng,
                    address: area.area_name.clone(),
                });
            }
        }
    }

    /// Areas to list in the dropdown.
    pub fn matching_areas<'a>(&self, areas: &'a [Area], dropdown_open: bool) -> Vec<&'a Area> {
        if dropdown_open && self.area_query.is_empty() {
            return areas.iter().collect();
        }
        let query = self.area_query.to_lowercase();
        areas
            .iter()
            .filter(|a| a.area_name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn is_submittable(&self) -> bool {
        [
            &self.house_number,
            &self.street,
            &self.area,
            &self.city,
            &self.state,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
            && self.map_location.is_some()
            && !self.submitting
    }

    /// The non-blank typed fields joined with `", "`.
    pub fn typed_address(&self) -> String {
        [
            &self.house_number,
            &self.street,
            &self.landmark,
            &self.area,
            &self.city,
            &self.state,
        ]
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// The catalogue area whose name matches the typed area.
    pub fn matched_area<'a>(&self, areas: &'a [Area]) -> Option<&'a Area> {
        let typed = self.area.trim();
        areas
            .iter()
            .find(|a| a.area_name.trim().eq_ignore_ascii_case(typed))
    }

    pub fn payload(&self, areas: &[Area]) -> UpdateAddressPayload {
        let area_id = self
            .matched_area(areas)
            .map(|a| a.id.clone())
            .unwrap_or_default();
        let location = self.map_location.as_ref();
        UpdateAddressPayload {
            address: StructuredAddress {
                house_number: self.house_number.clone(),
                street: self.street.clone(),
                landmark: self.landmark.clone(),
                area: self.area.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                latitude: Some(location.map_or(0.0, |l| l.lat)),
                longitude: Some(location.map_or(0.0, |l| l.lng)),
                mapped_address: location.map(|l| l.address.clone()).unwrap_or_default(),
                area_id: area_id.clone(),
                typed_address: self.typed_address(),
            },
            area_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GANDHINAGAR: LatLng = LatLng {
        lat: 23.237560,
        lng: 72.647781,
    };

    fn satellite() -> Area {
        Area {
            id: "a1".to_string(),
            area_name: "Satellite".to_string(),
            city_name: "Ahmedabad".to_string(),
            state_name: "Gujarat".to_string(),
            latitude: Some(23.03),
            longitude: Some(72.52),
            pincode: Some(380015),
        }
    }

    fn bopal() -> Area {
        Area {
            id: "a2".to_string(),
            area_name: "Bopal".to_string(),
            city_name: "Ahmedabad".to_string(),
            state_name: "Gujarat".to_string(),
            ..Area::default()
        }
    }

    fn customer(json: &str) -> Customer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_hydrate_from_typed_address() {
        let c = customer(
            r#"{ "id": "c1", "address": {
                "typedAddress": "12, MG Road, Near Park, Satellite, Ahmedabad, Gujarat",
                "latitude": 23.0, "longitude": 72.5, "mappedAddress": "MG Road" } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[], GANDHINAGAR);
        assert_eq!(form.house_number, "12");
        assert_eq!(form.street, "MG Road");
        assert_eq!(form.landmark, "Near Park");
        assert_eq!(form.area, "Satellite");
        assert_eq!(form.city, "Ahmedabad");
        assert_eq!(form.state, "Gujarat");
        assert_eq!(
            form.map_location,
            Some(MapLocation {
                lat: 23.0,
                lng: 72.5,
                address: "MG Road".to_string()
            })
        );
        assert_eq!(form.map_center, LatLng::new(23.0, 72.5));
    }

    #[test]
    fn test_hydrate_prefers_structured_fields() {
        let c = customer(
            r#"{ "id": "c1", "address": {
                "houseNumber": "7", "street": "Ring Road", "area": "Bopal",
                "city": "Ahmedabad", "state": "Gujarat",
                "typedAddress": "stale, text" } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[satellite()], GANDHINAGAR);
        assert_eq!(form.house_number, "7");
        assert_eq!(form.street, "Ring Road");
        assert_eq!(form.landmark, "");
        // No area id: the stored area is what the area field shows
        assert_eq!(form.area, "Bopal");
        assert_eq!(form.area_query, "Bopal");
        assert_eq!(form.matching_areas(&[satellite(), bopal()], true).len(), 1);
        assert!(form.map_location.is_none());
        assert_eq!(form.map_center, GANDHINAGAR);
    }

    #[test]
    fn test_hydrate_legacy_string_and_area_coordinates() {
        let c = customer(
            r#"{ "id": "c1", "address": "3, Old Street",
                 "area": { "latitude": 22.5, "longitude": 72.9 } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[], GANDHINAGAR);
        assert_eq!(form.house_number, "3");
        assert_eq!(form.street, "Old Street");
        assert_eq!(form.area, "");
        let pin = form.map_location.unwrap();
        assert_eq!((pin.lat, pin.lng), (22.5, 72.9));
        assert_eq!(pin.address, "3, Old Street");
    }

    #[test]
    fn test_hydrate_mapped_address_falls_back_to_typed() {
        let c = customer(
            r#"{ "id": "c1", "address": { "typedAddress": "1, A", "latitude": 1.0, "longitude": 2.0, "mappedAddress": " " } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[], GANDHINAGAR);
        assert_eq!(form.map_location.unwrap().address, "1, A");
    }

    #[test]
    fn test_hydrate_matched_area_sets_query_and_centre() {
        let c = customer(
            r#"{ "id": "c1", "areaId": "a1", "address": { "typedAddress": "", "latitude": 23.0, "longitude": 72.5 } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[bopal(), satellite()], GANDHINAGAR);
        assert_eq!(form.area_query, "Satellite");
        assert_eq!(form.area, "Satellite");
        assert_eq!(form.map_center, LatLng::new(23.03, 72.52));
        // The pin stays on the stored coordinates
        assert_eq!(form.map_location.unwrap().lat, 23.0);
    }

    #[test]
    fn test_hydrate_without_profile() {
        let form = AddressForm::hydrate(None, &[satellite()], GANDHINAGAR);
        assert_eq!(form, AddressForm::empty(GANDHINAGAR));
    }

    #[test]
    fn test_apply_geocode_keeps_typed_area() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.area = "Satellite".to_string();
        let result: GeocodeResult = serde_json::from_str(
            r#"{ "display_name": "Somewhere, Gujarat",
                 "address": { "road": "SG Highway", "suburb": "Thaltej", "city": "Ahmedabad", "state": "Gujarat" } }"#,
        )
        .unwrap();
        form.apply_geocode(&result, 23.05, 72.5);
        assert_eq!(form.area, "Satellite");
        assert_eq!(form.street, "SG Highway");
        assert_eq!(form.house_number, "Somewhere");
        assert_eq!(form.city, "Ahmedabad");
        assert_eq!(form.map_center, LatLng::new(23.05, 72.5));
        assert_eq!(form.map_location.unwrap().address, "Somewhere, Gujarat");
    }

    #[test]
    fn test_apply_geocode_fills_empty_area() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.landmark = "Temple".to_string();
        let result: GeocodeResult =
            serde_json::from_str(r#"{ "address": { "neighbourhood": "Vastrapur" } }"#).unwrap();
        form.apply_geocode(&result, 1.0, 2.0);
        assert_eq!(form.area, "Vastrapur");
        assert_eq!(form.area_query, "Vastrapur");
        assert_eq!(form.landmark, "Temple");
    }

    #[test]
    fn test_hydrate_keeps_stored_area_over_catalogue_name() {
        let c = customer(
            r#"{ "id": "c1", "areaId": "a1", "address": {
                "houseNumber": "7", "street": "Ring Road", "area": "Satellite West",
                "city": "Ahmedabad", "state": "Gujarat" } }"#,
        );
        let form = AddressForm::hydrate(Some(&c), &[satellite()], GANDHINAGAR);
        assert_eq!(form.area, "Satellite West");
        assert_eq!(form.area_query, "Satellite");
    }

    #[test]
    fn test_set_area_text_filters_dropdown() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.set_area_text("bop");
        assert_eq!(form.area, "bop");
        let areas = [satellite(), bopal()];
        let names: Vec<_> = form
            .matching_areas(&areas, false)
            .iter()
            .map(|a| a.area_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bopal"]);
    }

    #[test]
    fn test_select_area_moves_pin_only_when_map_shown() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.select_area(&satellite());
        assert_eq!(form.area, "Satellite");
        assert_eq!(form.city, "Ahmedabad");
        assert_eq!(form.state, "Gujarat");
        assert_eq!(form.map_center, LatLng::new(23.03, 72.52));
        assert!(form.map_location.is_none());

        form.show_map = true;
        form.select_area(&satellite());
        assert_eq!(form.map_location.unwrap().address, "Satellite");
    }

    #[test]
    fn test_matching_areas() {
        let areas = [satellite(), bopal()];
        let mut form = AddressForm::empty(GANDHINAGAR);
        assert_eq!(form.matching_areas(&areas, true).len(), 2);

        form.area_query = "SAT".to_string();
        let names: Vec<_> = form
            .matching_areas(&areas, true)
            .iter()
            .map(|a| a.area_name.as_str())
            .collect();
        assert_eq!(names, vec!["Satellite"]);
    }

    #[test]
    fn test_submittable_requires_fields_and_pin() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.house_number = "12".to_string();
        form.street = "MG Road".to_string();
        form.select_area(&satellite());
        assert!(!form.is_submittable());

        form.map_location = Some(MapLocation {
            lat: 23.0,
            lng: 72.5,
            address: "MG Road".to_string(),
        });
        assert!(form.is_submittable());

        form.submitting = true;
        assert!(!form.is_submittable());
    }

    #[test]
    fn test_payload() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.house_number = "12".to_string();
        form.street = "MG Road".to_string();
        form.area = " satellite ".to_string();
        form.city = "Ahmedabad".to_string();
        form.state = "Gujarat".to_string();
        form.map_location = Some(MapLocation {
            lat: 23.0,
            lng: 72.5,
            address: "MG Road".to_string(),
        });

        let payload = form.payload(&[bopal(), satellite()]);
        assert_eq!(payload.area_id, "a1");
        assert_eq!(payload.address.area_id, "a1");
        assert_eq!(payload.address.typed_address, "12, MG Road, satellite, Ahmedabad, Gujarat");
        assert_eq!(payload.address.coordinates(), Some(LatLng::new(23.0, 72.5)));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["areaId"], "a1");
        assert_eq!(json["address"]["houseNumber"], "12");
        assert_eq!(json["address"]["mappedAddress"], "MG Road");
    }

    #[test]
    fn test_payload_unknown_area_has_empty_id() {
        let mut form = AddressForm::empty(GANDHINAGAR);
        form.area = "Nowhere".to_string();
        assert_eq!(form.payload(&[satellite()]).area_id, "");
    }
}
