use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::{
    ResqError,
    backend::Backend,
    codec,
    storage_keys::StorageKeys,
    storage_types::ListSlice,
};

/// Backend handle plus the key scheme, shared by every store.
#[derive(Clone)]
pub(crate) struct StorageInternal {
    backend: Arc<dyn Backend>,
    pub(crate) keys: StorageKeys,
}

impl StorageInternal {
    pub fn new(backend: Arc<dyn Backend>, namespace: Option<String>) -> Self {
        let keys = StorageKeys::new(namespace.unwrap_or_default());
        Self { backend, keys }
    }

    pub fn namespace(&self) -> &str {
        &self.keys.namespace
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Reads `count` decoded items of the list at the fully namespaced `key`,
    /// starting at `start`.
    pub async fn list_range<T>(
        &self,
        key: &str,
        start: isize,
        count: usize,
    ) -> Result<ListSlice<T>, ResqError>
    where
        T: DeserializeOwned,
    {
        if count == 1 {
            let item = self.backend.lindex(key, start).await?;
            return Ok(ListSlice::Single(codec::decode(item)?));
        }

        if count == 0 {
            return Ok(ListSlice::Many(vec![]));
        }

        let stop = start.saturating_add_unsigned(count - 1);
        let items = self.backend.lrange(key, start, stop).await?;
        let mut decoded = Vec::with_capacity(items.len());
        for item in items {
            if let Some(item) = codec::decode(Some(item))? {
                decoded.push(item);
            }
        }
        Ok(ListSlice::Many(decoded))
    }

    /// Deletes every key under the namespace and returns how many there were.
    pub async fn flush(&self) -> Result<usize, ResqError> {
        let keys = self.backend.keys(&self.keys.all_pattern()).await?;
        for key in keys.iter() {
            self.backend.del(key).await?;
        }

        tracing::debug!(namespace = self.namespace(), count = keys.len(), "Flushed namespace");

        Ok(keys.len())
    }
}
