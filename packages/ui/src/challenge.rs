//! Invisible reCAPTCHA widget used by phone sign-in.
//!
//! A [`ChallengeLease`] is acquired when a dialog opens and renders a fresh
//! widget under `#recaptcha-container`. Dropping the lease resets and removes
//! the widget, so every close path releases it.
//!
//! Each acquisition has a ticket. The page keeps the rendered widget under
//! that ticket, and a release that arrives before the widget has rendered
//! marks the ticket cancelled so the late render is skipped.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use api::{AuthError, BotChallenge};
use dioxus::document::{Document, Eval};
use dioxus::prelude::*;

const RECAPTCHA_SCRIPT: &str = "https://www.google.com/recaptcha/api.js?render=explicit";
const CONTAINER_ID: &str = "recaptcha-container";
const FAILED: &str = "Verification failed. Please try again.";

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

fn render_script(ticket: u64, site_key: &str) -> Result<String, String> {
    let site_key = serde_json::to_string(site_key).map_err(|e| e.to_string())?;
    Ok(format!(
        r#"(function() {{
            var store = window.storefrontChallenge = window.storefrontChallenge || {{}};
            var render = function() {{
                grecaptcha.ready(function() {{
                    if (store['cancelled{ticket}']) {{
                        delete store['cancelled{ticket}'];
                        return;
                    }}
                    var container = document.getElementById('{CONTAINER_ID}');
                    if (!container) {{
                        container = document.createElement('div');
                        container.id = '{CONTAINER_ID}';
                        document.body.appendChild(container);
                    }}
                    var slot = document.createElement('div');
                    container.appendChild(slot);
                    var answer = function(token) {{
                        var pending = store['pending{ticket}'];
                        store['pending{ticket}'] = null;
                        if (pending) pending(token);
                    }};
                    var id = grecaptcha.render(slot, {{
                        sitekey: {site_key},
                        size: 'invisible',
                        callback: answer,
                        'error-callback': function() {{ answer(null); }},
                        'expired-callback': function() {{ answer(null); }}
                    }});
                    store['ticket{ticket}'] = {{ id: id, slot: slot }};
                    dioxus.send(id);
                }});
            }};
            if (window.grecaptcha && window.grecaptcha.render) {{ render(); return; }}
            var script = document.getElementById('recaptcha-js');
            if (!script) {{
                script = document.createElement('script');
                script.id = 'recaptcha-js';
                script.src = '{RECAPTCHA_SCRIPT}';
                script.async = true;
                document.head.appendChild(script);
            }}
            script.addEventListener('load', render);
        }})();"#
    ))
}

/// A solved widget issues no further callbacks until it is reset.
fn execute_script(ticket: u64, widget_id: i64) -> String {
    format!(
        r#"var store = window.storefrontChallenge;
        store['pending{ticket}'] = function(token) {{ dioxus.send(token); }};
        grecaptcha.reset({widget_id});
        grecaptcha.execute({widget_id});"#
    )
}

/// Remove the ticket's widget, or cancel it if it has not rendered yet.
fn release_script(ticket: u64) -> String {
    format!(
        r#"(function() {{
            var store = window.storefrontChallenge = window.storefrontChallenge || {{}};
            var entry = store['ticket{ticket}'];
            if (!entry) {{
                store['cancelled{ticket}'] = true;
                return;
            }}
            if (window.grecaptcha) grecaptcha.reset(entry.id);
            if (entry.slot.parentNode) entry.slot.parentNode.removeChild(entry.slot);
            delete store['ticket{ticket}'];
            delete store['pending{ticket}'];
        }})();"#
    )
}

pub struct ChallengeLease {
    ticket: u64,
    widget_id: i64,
    document: Rc<dyn Document>,
}

impl ChallengeLease {
    /// Load the widget script if needed and render a new widget for `ticket`.
    pub async fn acquire(ticket: u64, site_key: &str) -> Result<Self, String> {
        if site_key.is_empty() {
            return Err("Phone sign-in is not available right now.".to_string());
        }
        let document = dioxus::document::document();
        let mut eval = document.eval(render_script(ticket, site_key)?);
        let widget_id = eval
            .recv::<i64>()
            .await
            .map_err(|e| format!("Verification widget failed to load: {e:?}"))?;
        tracing::debug!("Rendered challenge widget {widget_id}");
        Ok(Self {
            ticket,
            widget_id,
            document,
        })
    }

    /// Start a challenge. The returned eval yields the token once solved, or
    /// `null` when the widget errors or expires.
    pub fn execute(&self) -> Eval {
        self.document.eval(execute_script(self.ticket, self.widget_id))
    }

    /// Run a challenge to completion.
    pub async fn token(&self) -> Result<String, String> {
        match self.execute().recv::<Option<String>>().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(FAILED.to_string()),
            Err(e) => {
                tracing::warn!("Challenge did not answer: {e:?}");
                Err(FAILED.to_string())
            }
        }
    }
}

impl Drop for ChallengeLease {
    fn drop(&mut self) {
        self.document.eval(release_script(self.ticket));
        tracing::debug!("Released challenge widget {}", self.widget_id);
    }
}

/// A dialog's challenge widget, acquired on mount.
#[derive(Clone, Copy)]
pub struct Challenge {
    lease: Signal<Option<Rc<ChallengeLease>>>,
    error: Signal<Option<String>>,
}

impl Challenge {
    /// Solve a challenge with the dialog's widget.
    pub async fn token(&self) -> Result<String, String> {
        if let Some(e) = self.error.peek().clone() {
            return Err(e);
        }
        let lease = self
            .lease
            .peek()
            .clone()
            .ok_or_else(|| "Verification is still loading. Please try again.".to_string())?;
        lease.token().await
    }
}

impl BotChallenge for Challenge {
    async fn solve(&self) -> Result<String, AuthError> {
        self.token().await.map_err(AuthError::Challenge)
    }
}

/// Acquire a fresh widget for the calling component. It is released when the
/// component unmounts, including while it is still loading.
pub fn use_challenge(site_key: String) -> Challenge {
    let mut lease = use_signal(|| None::<Rc<ChallengeLease>>);
    let mut error = use_signal(|| None::<String>);
    let ticket = use_hook(|| NEXT_TICKET.fetch_add(1, Ordering::Relaxed));
    let acquired = use_hook(|| Rc::new(Cell::new(false)));
    let document = use_hook(dioxus::document::document);

    let loaded = acquired.clone();
    use_hook(move || {
        spawn(async move {
            match ChallengeLease::acquire(ticket, &site_key).await {
                Ok(widget) => {
                    loaded.set(true);
                    lease.set(Some(Rc::new(widget)));
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    error.set(Some(e));
                }
            }
        });
    });

    // Once acquired, the lease releases itself on drop.
    use_drop(move || {
        if !acquired.get() {
            document.eval(release_script(ticket));
        }
    });

    Challenge { lease, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_resets_before_running() {
        let script = execute_script(3, 7);
        let reset = script.find("grecaptcha.reset(7)").unwrap();
        let execute = script.find("grecaptcha.execute(7)").unwrap();
        assert!(reset < execute);
        assert!(script.contains("store['pending3']"));
    }

    #[test]
    fn test_render_skips_cancelled_ticket() {
        let script = render_script(4, "site-key").unwrap();
        let cancelled = script.find("store['cancelled4']").unwrap();
        let render = script.find("grecaptcha.render(").unwrap();
        assert!(cancelled < render);
        assert!(script.contains("store['ticket4'] = { id: id, slot: slot }"));
        assert!(script.contains("'error-callback'"));
    }

    #[test]
    fn test_release_before_render_cancels() {
        let script = release_script(5);
        assert!(script.contains("store['cancelled5'] = true"));
        assert!(script.contains("delete store['ticket5']"));
    }

    #[test]
    fn test_site_key_is_escaped() {
        let script = render_script(1, "k'\"").unwrap();
        assert!(script.contains(r#"sitekey: "k'\"""#));
    }
}
