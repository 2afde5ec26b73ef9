//! Runs [`shell::NativeBridge`] against the app's own WebView.
//!
//! [`HostBridge`] is the router's layout. It reports after every route change
//! whether the router can go back, and carries out the bridge's decision when
//! the page relays a hardware back press.

use dioxus::prelude::*;
use dioxus::router::Navigator;
use shell::{script, BackAction, NativeBridge, PushService, ScriptSink, WebMessage};
use store::StorefrontConfig;
use ui::SessionState;

use crate::device::{ConfiguredPush, WebViewLocation};
use crate::Route;

/// Evaluates host scripts in the page.
struct PageSink;

impl ScriptSink for PageSink {
    fn inject(&self, script: &str) {
        document::eval(script);
    }
}

/// Installs the page-side channel and feeds every message to the bridge.
async fn run(config: StorefrontConfig, session: Signal<SessionState>, nav: Navigator) {
    document::eval(&script::bootstrap());

    let mut bridge = NativeBridge::new(WebViewLocation, PageSink);
    bridge.start().await;
    match ConfiguredPush::new(&config).token().await {
        Some(token) => bridge.set_push_token(token),
        None => tracing::info!("No push token for this device"),
    }

    let mut channel = document::eval(&format!(
        "{} = {{ postMessage: function(message) {{ dioxus.send(message); }} }};",
        script::CHANNEL
    ));
    document::eval(&script::setup());
    bridge.set_can_go_back(nav.can_go_back());

    // The page may have reported its customer before the channel existed.
    let known = session.peek().client.customer_id().map(str::to_string);
    if let Some(customer_id) = known {
        let _ = bridge
            .handle_message(&WebMessage::CustomerId { customer_id }.to_json())
            .await;
    }

    loop {
        let client = ui::api_client(&config, &session.peek());
        bridge.register_push(&client).await;

        let Ok(raw) = channel.recv::<String>().await else {
            tracing::warn!("Bridge channel closed");
            break;
        };
        match bridge.handle_message(&raw).await {
            Ok(Some(BackAction::NavigateBack)) => nav.go_back(),
            Ok(Some(BackAction::Exit)) => tracing::debug!("Back press with no history"),
            Ok(None) | Err(_) => {}
        }
    }
}

#[component]
pub fn HostBridge() -> Element {
    let session = ui::use_session();
    let config = ui::use_config();
    let nav = use_navigator();
    let route = use_route::<Route>();

    use_hook(move || {
        spawn(run(config, session, nav));
    });

    use_effect(use_reactive!(|route| {
        tracing::trace!("Route changed to {route:?}");
        document::eval(&script::post_message(&WebMessage::NavigationState {
            can_go_back: nav.can_go_back(),
        }));
    }));

    rsx! {
        Outlet::<Route> {}
    }
}
