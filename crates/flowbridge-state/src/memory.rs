use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::repository::{Repository, RepositoryError, RepositoryItem};

/// A [Repository] that keeps every item in process memory. Items do not survive the process, so
/// hosts that can be killed while a flow is pending should provide their own implementation.
pub struct MemoryRepository<V> {
    items: RwLock<HashMap<String, V>>,
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> std::fmt::Debug for MemoryRepository<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRepository").finish()
    }
}

#[async_trait::async_trait]
impl<V: RepositoryItem + Clone> Repository<V> for MemoryRepository<V> {
    async fn get(&self, key: String) -> Result<Option<V>, RepositoryError> {
        Ok(self.items.read().await.get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<V>, RepositoryError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn set(&self, key: String, value: V) -> Result<(), RepositoryError> {
        self.items.write().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: String) -> Result<Option<V>, RepositoryError> {
        Ok(self.items.write().await.remove(&key))
    }
}
