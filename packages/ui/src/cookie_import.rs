//! Session hand-over from an embedding page.
//!
//! When the storefront is opened inside another site, that site passes the
//! session through `auth_token`, `customerData` and `customerId` cookies.

use dioxus::prelude::*;
use store::legacy::CookieImport;

use crate::session::{commit, use_config, use_session, SessionState};

#[cfg(target_arch = "wasm32")]
fn cookie_header() -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    document
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()?
        .cookie()
        .ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn cookie_header() -> Option<String> {
    None
}

/// Drop the query string and fragment the embedding page launched us with.
#[cfg(target_arch = "wasm32")]
fn clean_url() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let (Ok(history), Ok(path)) = (window.history(), window.location().pathname()) else {
        return;
    };
    let title = window.document().map(|d| d.title()).unwrap_or_default();
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, &title, Some(&path));
}

#[cfg(not(target_arch = "wasm32"))]
fn clean_url() {}

/// Import the cookie session into the client store. Returns whether one was found.
pub async fn import_cookie_session(session: Signal<SessionState>, lifetime_secs: i64) -> bool {
    let now = chrono::Utc::now().timestamp();
    let Some(import) = cookie_header()
        .as_deref()
        .and_then(|header| CookieImport::from_cookie_header(header, now, lifetime_secs))
    else {
        tracing::warn!("No auth_token cookie found");
        return false;
    };

    commit(session, |state| import.apply(state)).await;
    clean_url();
    tracing::info!("Imported session from cookies");
    true
}

/// Imports the cookie session once the stored state has loaded, then calls
/// `on_complete`.
#[component]
pub fn EmbeddedSessionImport(on_complete: EventHandler<bool>) -> Element {
    let session = use_session();
    let config = use_config();
    let lifetime = config.shell.cookie_session_secs;
    let mut started = use_signal(|| false);

    use_effect(move || {
        if session.read().loading || *started.peek() {
            return;
        }
        started.set(true);
        spawn(async move {
            let imported = import_cookie_session(session, lifetime).await;
            on_complete.call(imported);
        });
    });

    rsx! {
        div {
            class: "flex h-screen items-center justify-center text-neutral-500",
            "Signing you in..."
        }
    }
}
