//! Messages posted by the page to the native host, and the location payload
//! sent back.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebMessage {
    #[serde(rename = "GET_LOCATION")]
    GetLocation,

    #[serde(rename = "CUSTOMER_ID", rename_all = "camelCase")]
    CustomerId { customer_id: String },

    /// Whether the router has an entry to go back to.
    #[serde(rename = "NAVIGATION_STATE", rename_all = "camelCase")]
    NavigationState { can_go_back: bool },

    /// A hardware back press the page held back for the host.
    #[serde(rename = "HARDWARE_BACK")]
    HardwareBack,

    /// Any other `type`. Ignored.
    #[serde(other)]
    Other,
}

impl WebMessage {
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> String {
        // Serializing a tagged enum of strings cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
}

/// A position fix in the shape `navigator.geolocation` callbacks receive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coords: Coords,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            coords: Coords {
                latitude,
                longitude,
            },
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_messages() {
        assert_eq!(
            WebMessage::parse(r#"{"type":"GET_LOCATION"}"#).unwrap(),
            WebMessage::GetLocation
        );
        assert_eq!(
            WebMessage::parse(r#"{"type":"CUSTOMER_ID","customerId":"c1"}"#).unwrap(),
            WebMessage::CustomerId {
                customer_id: "c1".to_string()
            }
        );
        assert_eq!(
            WebMessage::parse(r#"{"type":"NAVIGATION_STATE","canGoBack":true}"#).unwrap(),
            WebMessage::NavigationState { can_go_back: true }
        );
        assert_eq!(
            WebMessage::parse(r#"{"type":"HARDWARE_BACK"}"#).unwrap(),
            WebMessage::HardwareBack
        );
        assert_eq!(
            WebMessage::parse(r#"{"type":"SOMETHING_ELSE","x":1}"#).unwrap(),
            WebMessage::Other
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            WebMessage::parse("not json"),
            Err(BridgeError::Parse(_))
        ));
        assert!(WebMessage::parse(r#"{"type":"CUSTOMER_ID"}"#).is_err());
    }

    #[test]
    fn test_customer_id_wire_shape() {
        let json = WebMessage::CustomerId {
            customer_id: "c1".to_string(),
        }
        .to_json();
        assert_eq!(json, r#"{"type":"CUSTOMER_ID","customerId":"c1"}"#);
    }
}
