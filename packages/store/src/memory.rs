use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::state::KeyValueStore;

/// In-memory KeyValueStore for testing and previews.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    async fn put(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }

    async fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").await.is_none());

        store.put("a", "1".to_string()).await;
        assert_eq!(store.get("a").await.as_deref(), Some("1"));

        // Clones share the same map
        let other = store.clone();
        other.put("a", "2".to_string()).await;
        assert_eq!(store.get("a").await.as_deref(), Some("2"));

        store.remove("a").await;
        assert!(other.get("a").await.is_none());
    }
}
