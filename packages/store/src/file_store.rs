//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each
//! document as a file. It is used on desktop and mobile so the session and
//! profile survive app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>.json
//! ```
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/storefront/` |
//! | Linux | `~/.local/share/storefront/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\storefront\` |
//! | Android | App-internal storage (via `dirs`) |

use std::path::PathBuf;

use crate::state::KeyValueStore;

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    async fn put(&self, key: &str, value: String) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("Cannot create {}: {e}", self.base.display());
            return;
        }
        if let Err(e) = std::fs::write(self.path(key), value) {
            tracing::warn!("Cannot write {key}: {e}");
        }
    }

    async fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Session};
    use crate::state::StateStore;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("storefront_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let store = StateStore::new(FileStore::new(dir.clone()));
        store
            .update(|s| s.sign_in(Session::new("tok", None), Some(Customer::with_id("c9"))))
            .await
            .unwrap();

        // Re-open from same directory
        let reopened = StateStore::new(FileStore::new(dir.clone()));
        let state = reopened.load().await;
        assert_eq!(state.auth_token(), Some("tok"));
        assert_eq!(state.customer_id(), Some("c9"));

        reopened.clear().await;
        assert!(!reopened.exists().await);

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }
}
