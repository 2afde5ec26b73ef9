//! # Client store: one versioned document behind one accessor
//!
//! Everything the client remembers between launches lives in a single
//! [`ClientState`] document: the session, the customer profile snapshot, and
//! the cached area catalogue. [`StateStore`] is the only way to read or write
//! it, and it sits on top of any [`KeyValueStore`] backend.
//!
//! ## [`KeyValueStore`] trait
//!
//! An async interface with three methods (`get`/`put`/`remove`) over string
//! documents keyed by name. Implementations live in sibling modules:
//!
//! | Backend | Platform |
//! |---------|----------|
//! | [`crate::MemoryStore`] | tests, previews |
//! | [`crate::FileStore`] | desktop and mobile |
//! | `IdbStore` | web (IndexedDB via `rexie`) |
//!
//! ## Schema versioning
//!
//! The document carries `schema_version`. A document that is missing, cannot be
//! parsed, or was written by a newer client loads as [`ClientState::default`]
//! and is overwritten on the next save.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{Area, Customer, Session};

/// Key under which the client state document is stored.
pub const CLIENT_STATE_KEY: &str = "client-state";

/// Schema version written by this client.
pub const SCHEMA_VERSION: u32 = 1;

/// Async trait for storing and retrieving string documents by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Option<String>>;
    fn put(&self, key: &str, value: String) -> impl std::future::Future<Output = ()>;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = ()>;
}

/// Everything persisted on the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    pub schema_version: u32,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            session: None,
            customer: None,
            areas: Vec::new(),
        }
    }
}

impl ClientState {
    /// Record a successful sign-in. Token, expiry and profile change together.
    pub fn sign_in(&mut self, session: Session, customer: Option<Customer>) {
        self.session = Some(session);
        if customer.is_some() {
            self.customer = customer;
        }
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.customer = None;
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .map(|c| c.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.auth_token.as_str())
    }
}

/// The single read/write accessor for [`ClientState`].
#[derive(Clone, Debug)]
pub struct StateStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether a state document has ever been written.
    pub async fn exists(&self) -> bool {
        self.backend.get(CLIENT_STATE_KEY).await.is_some()
    }

    /// Load the state, falling back to the default for missing or unreadable documents.
    pub async fn load(&self) -> ClientState {
        let Some(raw) = self.backend.get(CLIENT_STATE_KEY).await else {
            return ClientState::default();
        };
        match serde_json::from_str::<ClientState>(&raw) {
            Ok(state) if state.schema_version <= SCHEMA_VERSION => state,
            Ok(state) => {
                tracing::warn!(
                    "Client state has schema version {} (newer than {SCHEMA_VERSION}); starting fresh",
                    state.schema_version
                );
                ClientState::default()
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable client state: {e}");
                ClientState::default()
            }
        }
    }

    pub async fn save(&self, state: &ClientState) -> Result<(), StoreError> {
        let mut state = state.clone();
        state.schema_version = SCHEMA_VERSION;
        let raw = serde_json::to_string(&state)?;
        self.backend.put(CLIENT_STATE_KEY, raw).await;
        Ok(())
    }

    /// Load, apply `f`, save, and return the updated state.
    pub async fn update(
        &self,
        f: impl FnOnce(&mut ClientState),
    ) -> Result<ClientState, StoreError> {
        let mut state = self.load().await;
        f(&mut state);
        self.save(&state).await?;
        Ok(state)
    }

    pub async fn clear(&self) {
        self.backend.remove(CLIENT_STATE_KEY).await;
    }
}
