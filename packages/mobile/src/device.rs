//! Device services behind the native bridge.
//!
//! Location comes from the WebView's own geolocation, kept aside by
//! [`shell::script::setup`] before the page's `navigator.geolocation` is routed
//! through the host. The WebView asks the OS for permission on first use.
//! The push token is minted by the platform's push service and handed to the
//! app through `[shell] push_token`.

use dioxus::prelude::*;
use serde::Deserialize;
use shell::script::PLATFORM_GEOLOCATION;
use shell::{BridgeError, LocationFix, LocationService, PermissionStatus, PushService};
use store::StorefrontConfig;

const UNAVAILABLE: &str = "Location unavailable";

fn permission_script() -> String {
    format!(
        r#"var prompt = function() {{
            {PLATFORM_GEOLOCATION}.getCurrentPosition(
                function() {{ dioxus.send('granted'); }},
                function(error) {{ dioxus.send(error.code === 1 ? 'denied' : 'granted'); }}
            );
        }};
        if (!{PLATFORM_GEOLOCATION}) {{
            dioxus.send('denied');
        }} else if (navigator.permissions && navigator.permissions.query) {{
            navigator.permissions.query({{ name: 'geolocation' }}).then(function(status) {{
                if (status.state === 'prompt') prompt(); else dioxus.send(status.state);
            }}, prompt);
        }} else {{
            prompt();
        }}"#
    )
}

fn position_script() -> String {
    format!(
        r#"if (!{PLATFORM_GEOLOCATION}) {{
            dioxus.send({{ error: '{UNAVAILABLE}' }});
        }} else {{
            {PLATFORM_GEOLOCATION}.getCurrentPosition(
                function(position) {{
                    dioxus.send({{
                        coords: {{ latitude: position.coords.latitude, longitude: position.coords.longitude }},
                        timestamp: Math.round(position.timestamp)
                    }});
                }},
                function(error) {{ dioxus.send({{ error: error.message || '{UNAVAILABLE}' }}); }},
                {{ enableHighAccuracy: true, timeout: 15000, maximumAge: 10000 }}
            );
        }}"#
    )
}

fn permission_from_state(state: &str) -> PermissionStatus {
    match state {
        "granted" => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionReply {
    Fix(LocationFix),
    Failed { error: String },
}

impl PositionReply {
    fn into_fix(self) -> Result<LocationFix, BridgeError> {
        match self {
            PositionReply::Fix(fix) => Ok(fix),
            PositionReply::Failed { error } => Err(BridgeError::Location(error)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WebViewLocation;

impl LocationService for WebViewLocation {
    async fn request_permission(&self) -> PermissionStatus {
        let mut eval = document::eval(&permission_script());
        match eval.recv::<String>().await {
            Ok(state) => permission_from_state(&state),
            Err(e) => {
                tracing::warn!("Location permission check failed: {e:?}");
                PermissionStatus::Denied
            }
        }
    }

    async fn current_position(&self) -> Result<LocationFix, BridgeError> {
        let mut eval = document::eval(&position_script());
        match eval.recv::<PositionReply>().await {
            Ok(reply) => reply.into_fix(),
            Err(e) => {
                tracing::warn!("Position request failed: {e:?}");
                Err(BridgeError::Location(UNAVAILABLE.to_string()))
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfiguredPush {
    token: String,
}

impl ConfiguredPush {
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            token: config.shell.push_token.clone(),
        }
    }
}

impl PushService for ConfiguredPush {
    async fn token(&self) -> Option<String> {
        Some(self.token.clone()).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_states() {
        assert_eq!(permission_from_state("granted"), PermissionStatus::Granted);
        assert_eq!(permission_from_state("denied"), PermissionStatus::Denied);
        assert_eq!(permission_from_state("prompt"), PermissionStatus::Denied);
    }

    #[test]
    fn test_scripts_use_platform_geolocation() {
        assert!(permission_script().contains("window.platformGeolocation.getCurrentPosition("));
        assert!(permission_script().contains("navigator.permissions.query"));
        let position = position_script();
        assert!(position.contains("window.platformGeolocation.getCurrentPosition("));
        assert!(!position.contains("navigator.geolocation"));
    }

    #[test]
    fn test_position_replies() {
        let reply: PositionReply = serde_json::from_str(
            r#"{ "coords": { "latitude": 23.2, "longitude": 72.6 }, "timestamp": 1700000000000 }"#,
        )
        .unwrap();
        assert_eq!(reply.into_fix().unwrap(), LocationFix::new(23.2, 72.6, 1_700_000_000_000));

        let reply: PositionReply = serde_json::from_str(r#"{ "error": "User denied Geolocation" }"#).unwrap();
        assert_eq!(reply.into_fix().unwrap_err().to_string(), "User denied Geolocation");
    }

    #[tokio::test]
    async fn test_push_token_from_config() {
        let mut config = StorefrontConfig::default();
        assert_eq!(ConfiguredPush::new(&config).token().await, None);

        config.shell.push_token = "fcm-token".to_string();
        assert_eq!(ConfiguredPush::new(&config).token().await.as_deref(), Some("fcm-token"));
    }
}
