//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] loads the persisted [`ClientState`] once, keeps it in
//! a context signal, and is the only place components write it back through
//! (see [`commit`]).

use api::ApiClient;
use dioxus::prelude::*;
use shell::script;
use shell::WebMessage;
use store::{ClientState, StorefrontConfig};

use crate::storage::{make_state_store, migrate_legacy_storage};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub client: ClientState,
    /// True until the persisted state has been read.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            client: ClientState::default(),
            loading: true,
        }
    }
}

impl SessionState {
    pub fn signed_in(&self) -> bool {
        self.client.session.is_some()
    }
}

pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_config() -> StorefrontConfig {
    use_context::<StorefrontConfig>()
}

/// A REST client authenticated with the current session, if any.
pub fn api_client(config: &StorefrontConfig, session: &SessionState) -> ApiClient {
    ApiClient::new(config.api.base_url.clone())
        .with_token(session.client.auth_token().map(str::to_string))
}

/// Apply `f` to the persisted state and publish the result.
pub async fn commit(mut session: Signal<SessionState>, f: impl FnOnce(&mut ClientState)) {
    match make_state_store().update(f).await {
        Ok(client) => session.with_mut(|s| s.client = client),
        Err(e) => tracing::error!("Failed to save client state: {e}"),
    }
}

/// Re-fetch the signed-in customer's profile.
pub async fn refresh_customer(config: StorefrontConfig, session: Signal<SessionState>) {
    let state = session.peek().clone();
    let Some(id) = state.client.customer_id().map(str::to_string) else {
        return;
    };
    match api_client(&config, &state).customer(&id).await {
        Ok(customer) => commit(session, |s| s.customer = Some(customer)).await,
        Err(e) => tracing::warn!("Failed to refresh customer {id}: {e}"),
    }
}

async fn load_areas(config: StorefrontConfig, session: Signal<SessionState>) {
    let state = session.peek().clone();
    match api_client(&config, &state).areas().await {
        Ok(areas) => {
            tracing::debug!("Fetched {} areas", areas.len());
            commit(session, |s| s.areas = areas).await;
        }
        Err(e) => tracing::warn!("Failed to fetch areas: {e}"),
    }
}

/// Provider component that owns the configuration and the client state.
#[component]
pub fn SessionProvider(config: StorefrontConfig, children: Element) -> Element {
    let config = use_context_provider(|| config);
    let mut session = use_context_provider(|| Signal::new(SessionState::default()));

    let loader_config = config.clone();
    let _ = use_resource(move || {
        let config = loader_config.clone();
        async move {
            migrate_legacy_storage().await;
            let client = make_state_store().load().await;
            let needs_areas = client.areas.is_empty();
            session.set(SessionState {
                client,
                loading: false,
            });
            if needs_areas {
                load_areas(config, session).await;
            }
        }
    });

    // Tell a hosting native shell who is signed in.
    use_effect(move || {
        let state = session.read();
        if let Some(id) = state.client.customer_id() {
            document::eval(&script::post_message(&WebMessage::CustomerId {
                customer_id: id.to_string(),
            }));
        }
    });

    // Order updates pushed by the shell refresh the profile.
    let listener_config = config.clone();
    use_effect(move || {
        let config = listener_config.clone();
        spawn(async move {
            let js = format!(
                r#"window.addEventListener('{}', function(event) {{
                    dioxus.send(event.detail === undefined ? null : event.detail);
                }});"#,
                script::ORDER_STATUS_EVENT
            );
            let mut eval = document::eval(&js);
            while let Ok(detail) = eval.recv::<serde_json::Value>().await {
                tracing::info!("Order status notification: {detail}");
                refresh_customer(config.clone(), session).await;
            }
        });
    });

    rsx! {
        {children}
    }
}
