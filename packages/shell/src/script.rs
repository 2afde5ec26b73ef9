//! # Scripts injected into the page
//!
//! The host and the page talk through two paths:
//!
//! - **page → host**: `window.nativeBridge.postMessage(json)`, where `json` is
//!   a serialized [`WebMessage`].
//! - **host → page**: the host evaluates one of the scripts below, which
//!   dispatch `CustomEvent`s on `window`.
//!
//! | Event | Detail |
//! |-------|--------|
//! | `reactNativeLocationAvailable` | [`LocationFix`] |
//! | `reactNativeLocationError` | error message string |
//! | `orderStatusNotification` | notification payload |
//! | `orderStatusNotificationTap` | notification payload |
//!
//! Every value spliced into a script goes through `serde_json`, so the result
//! is a valid JavaScript literal whatever the input.

use serde::Serialize;

use crate::message::{LocationFix, WebMessage};

/// The page-side handle of the message channel.
pub const CHANNEL: &str = "window.nativeBridge";

/// Set by the host while the router has an entry to go back to.
pub const CAN_GO_BACK: &str = "window.nativeCanGoBack";

/// The WebView's own `getCurrentPosition`, kept by [`setup`] before it
/// reroutes `navigator.geolocation` through the host.
pub const PLATFORM_GEOLOCATION: &str = "window.platformGeolocation";

pub const LOCATION_AVAILABLE_EVENT: &str = "reactNativeLocationAvailable";
pub const LOCATION_ERROR_EVENT: &str = "reactNativeLocationError";
pub const ORDER_STATUS_EVENT: &str = "orderStatusNotification";
pub const ORDER_STATUS_TAP_EVENT: &str = "orderStatusNotificationTap";

fn literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn dispatch<T: Serialize + ?Sized>(event: &str, detail: &T) -> String {
    format!(
        "(function() {{ window.dispatchEvent(new CustomEvent({}, {{ detail: {} }})); }})();",
        literal(event),
        literal(detail)
    )
}

/// Runs before any page script: marks the page as hosted by the native shell.
pub fn bootstrap() -> String {
    "(function() { window.isInNativeShell = true; })();".to_string()
}

/// Installs `window.requestLocationFromApp`, routes `navigator.geolocation`
/// through the host and holds back hardware back presses while
/// [`CAN_GO_BACK`] is set. Safe to evaluate more than once.
pub fn setup() -> String {
    let request = literal(&WebMessage::GetLocation.to_json());
    let back = literal(&WebMessage::HardwareBack.to_json());
    format!(
        r#"(function() {{
  if (window.locationBridgeSetup) return;
  window.addEventListener('keydown', function(event) {{
    if ((event.key === 'GoBack' || event.key === 'BrowserBack') && {CAN_GO_BACK} && {CHANNEL}) {{
      event.preventDefault();
      {CHANNEL}.postMessage({back});
    }}
  }});
  {PLATFORM_GEOLOCATION} = {{
    getCurrentPosition: navigator.geolocation.getCurrentPosition.bind(navigator.geolocation)
  }};
  window.requestLocationFromApp = function() {{
    if ({CHANNEL}) {CHANNEL}.postMessage({request});
  }};
  var listen = function(success, error, once) {{
    var onFix = function(event) {{
      success(event.detail);
      if (once) cleanup();
    }};
    var onError = function(event) {{
      if (error) error({{ code: 1, message: event.detail }});
      if (once) cleanup();
    }};
    var cleanup = function() {{
      window.removeEventListener('{LOCATION_AVAILABLE_EVENT}', onFix);
      window.removeEventListener('{LOCATION_ERROR_EVENT}', onError);
    }};
    window.addEventListener('{LOCATION_AVAILABLE_EVENT}', onFix);
    window.addEventListener('{LOCATION_ERROR_EVENT}', onError);
    window.requestLocationFromApp();
  }};
  navigator.geolocation.getCurrentPosition = function(success, error) {{
    listen(success, error, true);
  }};
  navigator.geolocation.watchPosition = function(success, error) {{
    listen(success, error, false);
    return Math.floor(Math.random() * 1000000);
  }};
  window.locationBridgeSetup = true;
}})();"#
    )
}

/// Hands a position fix to the pending geolocation callbacks.
pub fn location_available(fix: &LocationFix) -> String {
    dispatch(LOCATION_AVAILABLE_EVENT, fix)
}

pub fn location_error(message: &str) -> String {
    dispatch(LOCATION_ERROR_EVENT, message)
}

pub fn order_status_notification<T: Serialize + ?Sized>(payload: &T) -> String {
    dispatch(ORDER_STATUS_EVENT, payload)
}

pub fn order_status_notification_tap<T: Serialize + ?Sized>(payload: &T) -> String {
    dispatch(ORDER_STATUS_TAP_EVENT, payload)
}

/// Posts `message` to the host when the page runs inside the shell.
pub fn post_message(message: &WebMessage) -> String {
    format!(
        "(function() {{ if (window.isInNativeShell && {CHANNEL}) {CHANNEL}.postMessage({}); }})();",
        literal(&message.to_json())
    )
}

pub fn can_go_back(can_go_back: bool) -> String {
    format!("{CAN_GO_BACK} = {can_go_back};")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_marks_shell() {
        assert!(bootstrap().contains("window.isInNativeShell = true"));
    }

    #[test]
    fn test_setup_is_guarded_and_posts_get_location() {
        let script = setup();
        assert!(script.contains("if (window.locationBridgeSetup) return;"));
        assert!(script.contains("window.locationBridgeSetup = true;"));
        assert!(script.contains(r#"window.nativeBridge.postMessage("{\"type\":\"GET_LOCATION\"}")"#));
        assert!(script.contains("navigator.geolocation.watchPosition"));
        assert!(script.contains("'reactNativeLocationError'"));
    }

    #[test]
    fn test_setup_keeps_platform_geolocation_first() {
        let script = setup();
        let kept = script.find("window.platformGeolocation = {").unwrap();
        let replaced = script.find("navigator.geolocation.getCurrentPosition = function").unwrap();
        assert!(kept < replaced);
    }

    #[test]
    fn test_setup_holds_back_press_only_when_allowed() {
        let script = setup();
        assert!(script.contains("(event.key === 'GoBack' || event.key === 'BrowserBack') && window.nativeCanGoBack"));
        assert!(script.contains(r#"window.nativeBridge.postMessage("{\"type\":\"HARDWARE_BACK\"}")"#));
        assert_eq!(can_go_back(false), "window.nativeCanGoBack = false;");
    }

    #[test]
    fn test_location_available_embeds_fix() {
        let script = location_available(&LocationFix::new(23.5, 72.25, 1_700_000_000_000));
        assert!(script.contains(r#"new CustomEvent("reactNativeLocationAvailable""#));
        assert!(script.contains(r#""coords":{"latitude":23.5,"longitude":72.25}"#));
        assert!(script.contains(r#""timestamp":1700000000000"#));
    }

    #[test]
    fn test_location_error_escapes_message() {
        let script = location_error("it's \"broken\"\n</script>");
        assert!(script.contains(r#"detail: "it's \"broken\"\n</script>""#));
    }

    #[test]
    fn test_order_status_events() {
        let payload = serde_json::json!({ "orderId": "o1", "status": "preparing" });
        assert!(order_status_notification(&payload).contains(r#""orderStatusNotification""#));
        assert!(order_status_notification_tap(&payload)
            .contains(r#""orderStatusNotificationTap", { detail: {"orderId":"o1","status":"preparing"} }"#));
    }

    #[test]
    fn test_post_customer_id() {
        let script = post_message(&WebMessage::CustomerId {
            customer_id: "c1".to_string(),
        });
        assert!(script.contains(r#"postMessage("{\"type\":\"CUSTOMER_ID\",\"customerId\":\"c1\"}")"#));
    }
}
