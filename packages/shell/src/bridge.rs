//! # Native side of the WebView bridge
//!
//! [`NativeBridge`] owns everything the host tracks on behalf of the page:
//! whether location permission has been granted, whether the page can go
//! back, and the [`PushPairing`]. Platform services sit behind two traits so
//! the bridge runs unchanged under test:
//!
//! - [`LocationService`]: permission prompt and position fixes;
//! - [`ScriptSink`]: evaluates a script in the page.

use std::future::Future;

use crate::error::BridgeError;
use crate::message::{LocationFix, WebMessage};
use crate::navigation::{self, BackAction};
use crate::push::{PushPairing, PushTokenSink};
use crate::script;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

pub trait LocationService {
    fn request_permission(&self) -> impl Future<Output = PermissionStatus>;
    fn current_position(&self) -> impl Future<Output = Result<LocationFix, BridgeError>>;
}

pub trait ScriptSink {
    fn inject(&self, script: &str);
}

pub struct NativeBridge<L, W> {
    location: L,
    sink: W,
    permission_granted: bool,
    can_go_back: bool,
    pairing: PushPairing,
}

impl<L: LocationService, W: ScriptSink> NativeBridge<L, W> {
    pub fn new(location: L, sink: W) -> Self {
        Self {
            location,
            sink,
            permission_granted: false,
            can_go_back: false,
            pairing: PushPairing::new(),
        }
    }

    /// Ask for location permission up front. A denial is only logged; the
    /// next location request asks again.
    pub async fn start(&mut self) {
        self.permission_granted = self.location.request_permission().await == PermissionStatus::Granted;
        if !self.permission_granted {
            tracing::warn!("Permission to access location was denied");
        }
    }

    pub fn pairing(&self) -> &PushPairing {
        &self.pairing
    }

    pub fn set_push_token(&mut self, token: impl Into<String>) {
        self.pairing.set_token(token);
    }

    /// Record whether the router can go back and tell the page, which only
    /// holds back hardware back presses while this is set.
    pub fn set_can_go_back(&mut self, can_go_back: bool) {
        if self.can_go_back != can_go_back {
            self.sink.inject(&script::can_go_back(can_go_back));
        }
        self.can_go_back = can_go_back;
    }

    /// Handle one raw message posted by the page. Returns the decision for a
    /// relayed hardware back press; the host carries out `NavigateBack`.
    pub async fn handle_message(&mut self, raw: &str) -> Result<Option<BackAction>, BridgeError> {
        let message = WebMessage::parse(raw).inspect_err(|e| tracing::error!("{e}"))?;
        match message {
            WebMessage::GetLocation => self.provide_location().await,
            WebMessage::CustomerId { customer_id } => {
                tracing::debug!("Page reported customer {customer_id}");
                self.pairing.set_customer_id(customer_id);
            }
            WebMessage::NavigationState { can_go_back } => self.set_can_go_back(can_go_back),
            WebMessage::HardwareBack => return Ok(Some(self.on_hardware_back())),
            WebMessage::Other => tracing::debug!("Ignoring bridge message: {raw}"),
        }
        Ok(None)
    }

    async fn provide_location(&mut self) {
        if !self.permission_granted {
            if self.location.request_permission().await != PermissionStatus::Granted {
                tracing::warn!("Location permission denied");
                self.sink
                    .inject(&script::location_error(&BridgeError::PermissionDenied.to_string()));
                return;
            }
            self.permission_granted = true;
        }

        match self.location.current_position().await {
            Ok(fix) => self.sink.inject(&script::location_available(&fix)),
            Err(e) => {
                tracing::error!("Error getting location: {e}");
                self.sink.inject(&script::location_error(&e.to_string()));
            }
        }
    }

    /// Register the push token once both halves are known.
    pub async fn register_push<S: PushTokenSink>(&mut self, sink: &S) -> Option<Result<(), BridgeError>> {
        self.pairing.register_if_ready(sink).await
    }

    pub fn on_hardware_back(&self) -> BackAction {
        navigation::on_hardware_back(self.can_go_back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeLocation {
        answers: Mutex<Vec<PermissionStatus>>,
        prompts: Mutex<usize>,
        fix: Result<LocationFix, String>,
    }

    impl FakeLocation {
        fn answering(answers: &[PermissionStatus]) -> Self {
            let mut answers = answers.to_vec();
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                prompts: Mutex::new(0),
                fix: Ok(LocationFix::new(23.2, 72.6, 1_000)),
            }
        }
    }

    impl LocationService for FakeLocation {
        async fn request_permission(&self) -> PermissionStatus {
            *self.prompts.lock().unwrap() += 1;
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(PermissionStatus::Denied)
        }

        async fn current_position(&self) -> Result<LocationFix, BridgeError> {
            self.fix.clone().map_err(BridgeError::Location)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        scripts: Mutex<Vec<String>>,
    }

    impl ScriptSink for &RecordingSink {
        fn inject(&self, script: &str) {
            self.scripts.lock().unwrap().push(script.to_string());
        }
    }

    const GET_LOCATION: &str = r#"{"type":"GET_LOCATION"}"#;

    #[tokio::test]
    async fn test_permission_denied_injects_error() {
        let sink = RecordingSink::default();
        let mut bridge = NativeBridge::new(FakeLocation::answering(&[]), &sink);
        bridge.handle_message(GET_LOCATION).await.unwrap();

        let scripts = sink.scripts.lock().unwrap();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("reactNativeLocationError"));
        assert!(scripts[0].contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_rerequests_once_per_message_after_start_denial() {
        let sink = RecordingSink::default();
        let location = FakeLocation::answering(&[PermissionStatus::Denied, PermissionStatus::Granted]);
        let mut bridge = NativeBridge::new(location, &sink);
        bridge.start().await;

        bridge.handle_message(GET_LOCATION).await.unwrap();
        assert!(sink.scripts.lock().unwrap()[0].contains("reactNativeLocationAvailable"));
        assert_eq!(*bridge.location.prompts.lock().unwrap(), 2);

        // Granted permission is remembered
        bridge.handle_message(GET_LOCATION).await.unwrap();
        assert_eq!(*bridge.location.prompts.lock().unwrap(), 2);
        assert_eq!(sink.scripts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_position_failure_injects_error() {
        let sink = RecordingSink::default();
        let mut location = FakeLocation::answering(&[PermissionStatus::Granted]);
        location.fix = Err("Location unavailable".to_string());
        let mut bridge = NativeBridge::new(location, &sink);
        bridge.start().await;

        bridge.handle_message(GET_LOCATION).await.unwrap();
        let scripts = sink.scripts.lock().unwrap();
        assert!(scripts[0].contains("reactNativeLocationError"));
        assert!(scripts[0].contains("Location unavailable"));
    }

    #[tokio::test]
    async fn test_customer_id_feeds_pairing() {
        let sink = RecordingSink::default();
        let mut bridge = NativeBridge::new(FakeLocation::answering(&[]), &sink);
        bridge.set_push_token("tok");
        bridge
            .handle_message(r#"{"type":"CUSTOMER_ID","customerId":"c1"}"#)
            .await
            .unwrap();
        assert_eq!(bridge.pairing().pending().unwrap().customer_id, "c1");
        assert!(sink.scripts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_message() {
        let sink = RecordingSink::default();
        let mut bridge = NativeBridge::new(FakeLocation::answering(&[]), &sink);
        assert!(bridge.handle_message("{").await.is_err());
        assert!(bridge.handle_message(r#"{"type":"PING"}"#).await.is_ok());
        assert!(sink.scripts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_back_press_follows_navigation_state() {
        let sink = RecordingSink::default();
        let mut bridge = NativeBridge::new(FakeLocation::answering(&[]), &sink);
        let back = r#"{"type":"HARDWARE_BACK"}"#;
        assert_eq!(bridge.handle_message(back).await.unwrap(), Some(BackAction::Exit));

        let state = r#"{"type":"NAVIGATION_STATE","canGoBack":true}"#;
        assert_eq!(bridge.handle_message(state).await.unwrap(), None);
        assert_eq!(bridge.handle_message(back).await.unwrap(), Some(BackAction::NavigateBack));
        assert_eq!(*sink.scripts.lock().unwrap(), vec![script::can_go_back(true)]);
    }

    #[test]
    fn test_can_go_back_injected_on_change_only() {
        let sink = RecordingSink::default();
        let mut bridge = NativeBridge::new(FakeLocation::answering(&[]), &sink);
        bridge.set_can_go_back(false);
        assert!(sink.scripts.lock().unwrap().is_empty());

        bridge.set_can_go_back(true);
        bridge.set_can_go_back(true);
        bridge.set_can_go_back(false);
        assert_eq!(
            *sink.scripts.lock().unwrap(),
            vec![script::can_go_back(true), script::can_go_back(false)]
        );
    }
}
