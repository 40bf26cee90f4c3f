//! In-memory token store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::Result;
use crate::traits::{StoreKey, TokenStore};

/// A [`TokenStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<StoreKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, keys: &[StoreKey]) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
