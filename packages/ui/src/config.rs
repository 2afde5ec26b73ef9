//! Platform-specific loading of [`StorefrontConfig`].
//!
//! - **Web**: compiled-in defaults plus `STOREFRONT_*` values present at build time.
//! - **Desktop / Mobile**: `<data_dir>/storefront/storefront.toml` when present,
//!   then `STOREFRONT_*` environment variables (a `.env` file is honoured).

use store::StorefrontConfig;

#[cfg(target_arch = "wasm32")]
pub fn load_config() -> StorefrontConfig {
    StorefrontConfig::default().with_overrides(|key| {
        match key {
            "STOREFRONT_API_BASE_URL" => option_env!("STOREFRONT_API_BASE_URL"),
            "STOREFRONT_GEOCODER_URL" => option_env!("STOREFRONT_GEOCODER_URL"),
            "STOREFRONT_FIREBASE_API_KEY" => option_env!("STOREFRONT_FIREBASE_API_KEY"),
            "STOREFRONT_RECAPTCHA_SITE_KEY" => option_env!("STOREFRONT_RECAPTCHA_SITE_KEY"),
            "STOREFRONT_UNKNOWN_PHONE" => option_env!("STOREFRONT_UNKNOWN_PHONE"),
            "STOREFRONT_ADDRESS_FAILURE" => option_env!("STOREFRONT_ADDRESS_FAILURE"),
            _ => None,
        }
        .map(str::to_string)
    })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> StorefrontConfig {
    dotenvy::dotenv().ok();

    let path = crate::storage::data_dir().join(StorefrontConfig::filename());
    let config = match std::fs::read_to_string(&path) {
        Ok(raw) => StorefrontConfig::from_toml(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid {}: {e}", path.display());
            StorefrontConfig::default()
        }),
        Err(_) => StorefrontConfig::default(),
    };
    config.with_overrides(|key| std::env::var(key).ok())
}
