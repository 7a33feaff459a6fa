use std::{marker::PhantomData, sync::Arc};

use flowbridge_state::{Repository, RepositoryError, RepositoryItem};

use crate::error::{Error, Result};

/// Host-side persistence for pending flows. Values are opaque JSON documents, keyed by the flow's
/// `kind:handle` storage key.
///
/// `remove` must look up and delete the value as one step; only one caller may ever receive a
/// given value.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait FlowRecordStore: Send + Sync {
    #[allow(missing_docs)]
    async fn get(&self, key: String) -> Result<Option<String>>;
    #[allow(missing_docs)]
    async fn list(&self) -> Result<Vec<String>>;
    #[allow(missing_docs)]
    async fn set(&self, key: String, value: String) -> Result<()>;
    #[allow(missing_docs)]
    async fn remove(&self, key: String) -> Result<Option<String>>;
}

/// Bridge from [`FlowRecordStore`] to the internal [`Repository`] trait.
pub(crate) struct StoreRepositoryBridge<V> {
    store: Arc<dyn FlowRecordStore>,
    _item: PhantomData<fn() -> V>,
}

impl<V> StoreRepositoryBridge<V> {
    pub(crate) fn new(store: Arc<dyn FlowRecordStore>) -> Self {
        Self {
            store,
            _item: PhantomData,
        }
    }
}

fn store_error(e: Error) -> RepositoryError {
    RepositoryError::Internal(e.into_message())
}

fn decode<V: RepositoryItem>(value: Option<String>) -> Result<Option<V>, RepositoryError> {
    Ok(value.map(|v| serde_json::from_str(&v)).transpose()?)
}

#[async_trait::async_trait]
impl<V: RepositoryItem> Repository<V> for StoreRepositoryBridge<V> {
    async fn get(&self, key: String) -> Result<Option<V>, RepositoryError> {
        decode(self.store.get(key).await.map_err(store_error)?)
    }

    async fn list(&self) -> Result<Vec<V>, RepositoryError> {
        self.store
            .list()
            .await
            .map_err(store_error)?
            .iter()
            .map(|v| serde_json::from_str(v).map_err(RepositoryError::from))
            .collect()
    }

    async fn set(&self, key: String, value: V) -> Result<(), RepositoryError> {
        let value = serde_json::to_string(&value)?;
        self.store.set(key, value).await.map_err(store_error)
    }

    async fn remove(&self, key: String) -> Result<Option<V>, RepositoryError> {
        decode(self.store.remove(key).await.map_err(store_error)?)
    }
}
