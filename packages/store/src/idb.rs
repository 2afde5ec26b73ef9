//! # IndexedDB key/value store: browser-side persistence
//!
//! [`IdbStore`] is the [`KeyValueStore`] implementation used on the **web
//! platform**. It persists the client state document into the browser's
//! IndexedDB via the [`rexie`] crate.
//!
//! ## Database schema
//!
//! A single IndexedDB database named `"storefront"` (version 1) with one
//! object store:
//!
//! | IndexedDB store | Key | Value |
//! |-----------------|-----|-------|
//! | `"documents"` | document key (e.g. `"client-state"`) | JSON string (via `serde_wasm_bindgen`) |
//!
//! ## Connection management
//!
//! `IdbStore` opens a fresh [`Rexie`] connection on every operation. `Rexie`
//! does not implement `Clone`, and the browser caches IndexedDB connections
//! internally.
//!
//! ## Error handling
//!
//! Reads return `None` and writes do nothing when IndexedDB is unavailable,
//! so a broken database degrades to "signed out" rather than crashing.

use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

use crate::legacy;
use crate::state::{KeyValueStore, StateStore};

const DEFAULT_DB_NAME: &str = "storefront";
const DB_VERSION: u32 = 1;
const DOCUMENTS_STORE: &str = "documents";

/// IndexedDB-backed KeyValueStore for the web platform.
#[derive(Clone)]
pub struct IdbStore {
    db_name: String,
}

impl Default for IdbStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdbStore {
    pub fn new() -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
        }
    }

    async fn open_db(&self) -> Result<Rexie, rexie::Error> {
        Rexie::builder(&self.db_name)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(DOCUMENTS_STORE))
            .build()
            .await
    }

    /// Fold the legacy `localStorage` keys into the client state document.
    ///
    /// Only runs when no state document exists yet. The legacy keys are
    /// removed once the import has been written.
    pub async fn migrate_from_legacy_if_needed(&self) {
        let state_store = StateStore::new(self.clone());
        if state_store.exists().await {
            return;
        }

        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return;
        };
        let Some(state) = legacy::from_legacy_keys(|key| storage.get_item(key).ok().flatten())
        else {
            return;
        };

        if let Err(e) = state_store.save(&state).await {
            tracing::warn!("Legacy session import failed: {e}");
            return;
        }
        for key in legacy::LEGACY_KEYS {
            let _ = storage.remove_item(key);
        }
        tracing::info!("Imported legacy session from localStorage");
    }
}

impl KeyValueStore for IdbStore {
    async fn get(&self, key: &str) -> Option<String> {
        let db = self.open_db().await.ok()?;
        let tx = db
            .transaction(&[DOCUMENTS_STORE], TransactionMode::ReadOnly)
            .ok()?;
        let store = tx.store(DOCUMENTS_STORE).ok()?;

        let value = store.get(JsValue::from_str(key)).await.ok()??;
        serde_wasm_bindgen::from_value(value).ok()
    }

    async fn put(&self, key: &str, value: String) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[DOCUMENTS_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(DOCUMENTS_STORE) else {
            return;
        };

        let key = JsValue::from_str(key);
        let value = serde_wasm_bindgen::to_value(&value).unwrap_or(JsValue::NULL);
        let _ = store.put(&value, Some(&key)).await;
        let _ = tx.done().await;
    }

    async fn remove(&self, key: &str) {
        let Ok(db) = self.open_db().await else {
            return;
        };
        let Ok(tx) = db.transaction(&[DOCUMENTS_STORE], TransactionMode::ReadWrite) else {
            return;
        };
        let Ok(store) = tx.store(DOCUMENTS_STORE) else {
            return;
        };

        let _ = store.delete(JsValue::from_str(key)).await;
        let _ = tx.done().await;
    }
}
