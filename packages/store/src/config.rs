//! # Client configuration: `storefront.toml`
//!
//! [`StorefrontConfig`] collects every endpoint and every behaviour switch the
//! client needs. Native targets read it from `<data_dir>/storefront/storefront.toml`;
//! the web target uses the defaults plus a compile-time API base URL.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000/api"
//!
//! [geocoding]
//! reverse_url = "https://nominatim.openstreetmap.org/reverse"
//!
//! [auth]
//! country_code = "+91"
//! unknown_phone = "show_error"        # or "redirect_to_signup"
//! firebase_api_key = ""
//! recaptcha_site_key = ""
//!
//! [address]
//! on_update_failure = "fall_back_to_typed_area"   # or "surface_error"
//! default_latitude = 23.23756
//! default_longitude = 72.647781
//! map_zoom = 15
//!
//! [shell]
//! cookie_session_secs = 3600
//! push_token = ""                     # set by the mobile host
//! ```
//!
//! All sections derive `Default`, so a missing or partial file is equivalent to
//! the defaults for whatever it leaves out.
//!
//! ## Behaviour switches
//!
//! Two behaviours differed between earlier revisions of the client, so both
//! are selectable:
//!
//! | Switch | Values |
//! |--------|--------|
//! | [`UnknownPhonePolicy`] | show an error, or open the signup dialog |
//! | [`AddressFailurePolicy`] | close and fall back to the typed area, or keep the popup open with the error |

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::LatLng;

/// Top-level configuration stored in `storefront.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub address: AddressConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST backend root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,
}

fn default_reverse_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            reverse_url: default_reverse_url(),
        }
    }
}

/// What the login dialog does with a phone number the backend does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPhonePolicy {
    #[default]
    ShowError,
    RedirectToSignup,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Prefix used to build the E.164 number sent to the SMS provider.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default)]
    pub unknown_phone: UnknownPhonePolicy,
    #[serde(default)]
    pub firebase_api_key: String,
    #[serde(default)]
    pub recaptcha_site_key: String,
}

fn default_country_code() -> String {
    "+91".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            unknown_phone: UnknownPhonePolicy::default(),
            firebase_api_key: String::new(),
            recaptcha_site_key: String::new(),
        }
    }
}

/// What the location popup does when the address update request fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFailurePolicy {
    /// Close the popup and report the locally typed area name.
    #[default]
    FallBackToTypedArea,
    /// Keep the popup open and show the error.
    SurfaceError,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressConfig {
    #[serde(default)]
    pub on_update_failure: AddressFailurePolicy,
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    #[serde(default = "default_map_zoom")]
    pub map_zoom: u8,
}

// Gandhinagar
fn default_latitude() -> f64 {
    23.237560
}

fn default_longitude() -> f64 {
    72.647781
}

fn default_map_zoom() -> u8 {
    15
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            on_update_failure: AddressFailurePolicy::default(),
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            map_zoom: default_map_zoom(),
        }
    }
}

impl AddressConfig {
    pub fn default_center(&self) -> LatLng {
        LatLng::new(self.default_latitude, self.default_longitude)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Lifetime given to a session imported from cookies.
    #[serde(default = "default_cookie_session_secs")]
    pub cookie_session_secs: i64,
    /// Device push token handed over by the platform's push service.
    #[serde(default)]
    pub push_token: String,
}

fn default_cookie_session_secs() -> i64 {
    3600
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            cookie_session_secs: default_cookie_session_secs(),
            push_token: String::new(),
        }
    }
}

impl StorefrontConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "storefront.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply `STOREFRONT_*` overrides from `lookup` (usually the process environment).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("STOREFRONT_API_BASE_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("STOREFRONT_GEOCODER_URL") {
            self.geocoding.reverse_url = v;
        }
        if let Some(v) = lookup("STOREFRONT_FIREBASE_API_KEY") {
            self.auth.firebase_api_key = v;
        }
        if let Some(v) = lookup("STOREFRONT_RECAPTCHA_SITE_KEY") {
            self.auth.recaptcha_site_key = v;
        }
        if let Some(v) = lookup("STOREFRONT_PUSH_TOKEN") {
            self.shell.push_token = v.trim().to_string();
        }
        match lookup("STOREFRONT_UNKNOWN_PHONE").as_deref() {
            Some("redirect_to_signup") => self.auth.unknown_phone = UnknownPhonePolicy::RedirectToSignup,
            Some("show_error") => self.auth.unknown_phone = UnknownPhonePolicy::ShowError,
            Some(other) => tracing::warn!("Ignoring STOREFRONT_UNKNOWN_PHONE={other}"),
            None => {}
        }
        match lookup("STOREFRONT_ADDRESS_FAILURE").as_deref() {
            Some("surface_error") => self.address.on_update_failure = AddressFailurePolicy::SurfaceError,
            Some("fall_back_to_typed_area") => {
                self.address.on_update_failure = AddressFailurePolicy::FallBackToTypedArea
            }
            Some(other) => tracing::warn!("Ignoring STOREFRONT_ADDRESS_FAILURE={other}"),
            None => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_is_default() {
        let config = StorefrontConfig::from_toml("").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.auth.country_code, "+91");
        assert_eq!(config.shell.cookie_session_secs, 3600);
        assert_eq!(config.address.default_center(), LatLng::new(23.237560, 72.647781));
    }

    #[test]
    fn test_policies_parse() {
        let config = StorefrontConfig::from_toml(
            r#"
            [auth]
            unknown_phone = "redirect_to_signup"

            [address]
            on_update_failure = "surface_error"
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.unknown_phone, UnknownPhonePolicy::RedirectToSignup);
        assert_eq!(config.address.on_update_failure, AddressFailurePolicy::SurfaceError);
        // Untouched keys in a present section keep their defaults
        assert_eq!(config.address.map_zoom, 15);
    }

    #[test]
    fn test_invalid_file() {
        let err = StorefrontConfig::from_toml("[address]\nmap_zoom = \"close\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = StorefrontConfig::default();
        config.api.base_url = "https://api.example.com/api".to_string();
        let text = config.to_toml().unwrap();
        assert_eq!(StorefrontConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STOREFRONT_API_BASE_URL", "https://api.example.com/api/"),
            ("STOREFRONT_UNKNOWN_PHONE", "redirect_to_signup"),
            ("STOREFRONT_ADDRESS_FAILURE", "bogus"),
            ("STOREFRONT_PUSH_TOKEN", " fcm-token "),
        ]);
        let config =
            StorefrontConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.auth.unknown_phone, UnknownPhonePolicy::RedirectToSignup);
        assert_eq!(config.shell.push_token, "fcm-token");
        assert_eq!(
            config.address.on_update_failure,
            AddressFailurePolicy::FallBackToTypedArea
        );
    }
}
