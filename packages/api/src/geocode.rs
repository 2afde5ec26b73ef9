//! Reverse geocoding through a Nominatim-compatible endpoint.

use store::GeocodeResult;

use crate::error::ApiError;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ReverseGeocoder {
    http: reqwest::Client,
    url: String,
}

impl ReverseGeocoder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// `GET {url}?format=jsonv2&lat=..&lon=..`
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<GeocodeResult, ApiError> {
        let request = self.http.get(&self.url).query(&[
            ("format", "jsonv2".to_string()),
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
        ]);
        // Browsers refuse to override the user agent
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.header(reqwest::header::USER_AGENT, USER_AGENT);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Reverse geocoding returned {status}");
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
