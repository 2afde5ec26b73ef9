//! # Wire models shared by every crate in the workspace
//!
//! These are the records the storefront backend returns inside its
//! `{ success, data, message }` envelope. They are `Serialize + Deserialize`
//! so the same types travel over HTTP, into the persisted [`crate::ClientState`]
//! and through component props.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Customer`] | The signed-in customer's profile, including their address and orders. |
//! | [`CustomerAddress`] | Either a legacy free-text address or a [`StructuredAddress`]. |
//! | [`Area`] | A delivery zone with a geographic centre. Reference data. |
//! | [`Restaurant`] | A catalogue entry as returned by the backend, before normalization. |
//! | [`Session`] | Bearer token plus expiry. |
//!
//! The backend is lenient about which fields it sends, so every struct uses
//! `#[serde(default)]` and optional fields where the original payloads were
//! observed to omit them.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A delivery zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Area {
    pub id: String,
    pub area_name: String,
    pub city_name: String,
    pub state_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pincode: Option<u32>,
}

impl Area {
    /// The area centre, if both coordinates are present and non-zero.
    ///
    /// Zero is treated as "unset" because the backend fills missing
    /// coordinates with `0`.
    pub fn center(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }
}

/// The address record written by the location popup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredAddress {
    pub house_number: String,
    pub street: String,
    pub landmark: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mapped_address: String,
    pub area_id: String,
    /// Comma-joined typed fields, kept for older readers.
    pub typed_address: String,
}

impl StructuredAddress {
    /// Whether any of the individually typed fields is filled in.
    pub fn has_typed_fields(&self) -> bool {
        [
            &self.house_number,
            &self.street,
            &self.landmark,
            &self.area,
            &self.city,
            &self.state,
        ]
        .iter()
        .any(|f| !f.trim().is_empty())
    }

    pub fn coordinates(&self) -> Option<LatLng> {
        Some(LatLng::new(self.latitude?, self.longitude?))
    }
}

/// A customer address as stored by the backend.
///
/// Older profiles carry a single free-text string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerAddress {
    Structured(StructuredAddress),
    Legacy(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
}

/// The customer profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<CustomerAddress>,
    pub area_id: Option<String>,
    /// Embedded area from older profiles. Only its coordinates are still read.
    pub area: Option<Area>,
    pub orders: Vec<Order>,
}

impl Customer {
    /// A profile that only knows its identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// First character of the name, for the avatar badge.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }

    /// Whether any order is currently being prepared.
    pub fn has_preparing_order(&self) -> bool {
        self.orders.iter().any(|o| o.status == OrderStatus::Preparing)
    }

    /// Name of the area the customer delivers to: the address's area field,
    /// then the catalogue area matching `areaId`, then the embedded area.
    pub fn delivery_area(&self, areas: &[Area]) -> Option<String> {
        let from_address = self
            .structured_address()
            .map(|a| a.area.trim())
            .filter(|a| !a.is_empty());
        let area_id = self
            .structured_address()
            .map(|a| a.area_id.as_str())
            .filter(|id| !id.is_empty())
            .or(self.area_id.as_deref());
        let from_catalogue = area_id
            .and_then(|id| areas.iter().find(|a| a.id == id))
            .map(|a| a.area_name.as_str());
        let embedded = self.area.as_ref().map(|a| a.area_name.as_str());

        from_address
            .or(from_catalogue)
            .or(embedded)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
    }

    pub fn structured_address(&self) -> Option<&StructuredAddress> {
        match &self.address {
            Some(CustomerAddress::Structured(a)) => Some(a),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A restaurant as returned by `GET /restaurants`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Comma-joined cuisine names, e.g. `"Pizza, Burger"`.
    pub cuisines: Option<String>,
    pub address: Option<RestaurantAddress>,
    pub area: Option<Area>,
    pub is_open: Option<bool>,
}

impl Restaurant {
    /// Trimmed, lower-cased cuisine tokens.
    pub fn cuisine_tokens(&self) -> Vec<String> {
        self.cuisines
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .collect()
    }

    pub fn area_name(&self) -> &str {
        self.area.as_ref().map(|a| a.area_name.as_str()).unwrap_or_default()
    }
}

/// An authenticated session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub auth_token: String,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn new(auth_token: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            auth_token: auth_token.into(),
            expires_at,
        }
    }

    /// Expiry is recorded but nothing signs the customer out when it passes.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_with_structured_address() {
        let json = r#"{
            "id": "c1",
            "name": "Asha",
            "address": {
                "typedAddress": "12, MG Road",
                "latitude": 23.0,
                "longitude": 72.5,
                "mappedAddress": "MG Road"
            },
            "orders": [{ "id": "o1", "status": "preparing" }]
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        let addr = customer.structured_address().unwrap();
        assert_eq!(addr.typed_address, "12, MG Road");
        assert_eq!(addr.coordinates(), Some(LatLng::new(23.0, 72.5)));
        assert!(!addr.has_typed_fields());
        assert!(customer.has_preparing_order());
        assert_eq!(customer.initial(), Some('A'));
        assert_eq!(customer.delivery_area(&[]), None);
    }

    #[test]
    fn test_customer_with_legacy_address() {
        let json = r#"{ "id": "c2", "address": "1, Old Street" }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(
            customer.address,
            Some(CustomerAddress::Legacy("1, Old Street".to_string()))
        );
        assert!(customer.structured_address().is_none());
    }

    #[test]
    fn test_delivery_area_fallbacks() {
        let areas = vec![Area {
            id: "a1".to_string(),
            area_name: "Satellite".to_string(),
            ..Area::default()
        }];
        let customer = Customer {
            area_id: Some("a1".to_string()),
            ..Customer::with_id("c1")
        };
        assert_eq!(customer.delivery_area(&areas).as_deref(), Some("Satellite"));

        let customer = Customer {
            address: Some(CustomerAddress::Structured(StructuredAddress {
                area: " Bopal ".to_string(),
                ..StructuredAddress::default()
            })),
            ..customer
        };
        assert_eq!(customer.delivery_area(&areas).as_deref(), Some("Bopal"));
    }

    #[test]
    fn test_unknown_order_status() {
        let order: Order = serde_json::from_str(r#"{ "id": "o", "status": "teleported" }"#).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);
        let order: Order =
            serde_json::from_str(r#"{ "id": "o", "status": "out_for_delivery" }"#).unwrap();
        assert_eq!(order.status, OrderStatus::OutForDelivery);
    }

    #[test]
    fn test_area_center_ignores_zero() {
        let area = Area {
            latitude: Some(0.0),
            longitude: Some(72.5),
            ..Area::default()
        };
        assert!(area.center().is_none());

        let area = Area {
            latitude: Some(23.0),
            longitude: Some(72.5),
            ..Area::default()
        };
        assert_eq!(area.center(), Some(LatLng::new(23.0, 72.5)));
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::new("t", Some(100));
        assert!(!session.is_expired(99));
        assert!(session.is_expired(100));
        assert!(!Session::new("t", None).is_expired(i64::MAX));
    }
}
