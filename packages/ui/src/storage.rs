//! Shared client-store constructor for all platforms.
//!
//! Returns a [`store::StateStore`] backed by the appropriate [`store::KeyValueStore`]:
//! - **Web** (WASM + `web` feature): IndexedDB via [`store::IdbStore`]
//! - **Desktop / Mobile** (native): filesystem via [`store::FileStore`]

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("storefront")
}

pub fn make_state_store() -> store::StateStore<impl store::KeyValueStore> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::StateStore::new(store::IdbStore::new())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::StateStore::new(store::MemoryStore::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        store::StateStore::new(store::FileStore::new(data_dir()))
    }
}

/// Import the pre-migration browser keys into the client store, once.
pub async fn migrate_legacy_storage() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::IdbStore::new().migrate_from_legacy_if_needed().await;
    }
}
