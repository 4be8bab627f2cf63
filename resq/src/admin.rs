//! Read-only access to arbitrary keys, for diagnostic UIs.
//!
//! Keys are given and returned relative to the namespace. Nothing here is
//! meant for high-traffic or transactional use.

use crate::{
    ResqError, backend::KeyType, storage_internal::StorageInternal, storage_types::KeyValue,
};

/// Upper bound of the slice [`Admin::get_value`] returns for collections.
const VALUE_WINDOW: usize = 21;

#[derive(Clone)]
pub struct Admin {
    internal: StorageInternal,
}

impl Admin {
    pub(crate) fn new(internal: StorageInternal) -> Self {
        Self { internal }
    }

    pub async fn key_type(&self, key: &str) -> Result<KeyType, ResqError> {
        self.internal
            .backend()
            .key_type(&self.internal.keys.namespaced(key))
            .await
    }

    /// Element count for collections, byte length for strings, 0 otherwise.
    pub async fn get_size_of(&self, key: &str) -> Result<usize, ResqError> {
        let full_key = self.internal.keys.namespaced(key);
        let backend = self.internal.backend();

        match backend.key_type(&full_key).await? {
            KeyType::List => backend.llen(&full_key).await,
            KeyType::Set => backend.scard(&full_key).await,
            KeyType::ZSet => backend.zcard(&full_key).await,
            KeyType::String => backend.strlen(&full_key).await,
            KeyType::None | KeyType::Other(_) => Ok(0),
        }
    }

    /// Up to 21 elements from `start` for collections, the whole value for
    /// strings, [`KeyValue::Empty`] otherwise.
    pub async fn get_value(&self, key: &str, start: usize) -> Result<KeyValue, ResqError> {
        let full_key = self.internal.keys.namespaced(key);
        let backend = self.internal.backend();
        let Ok(from) = isize::try_from(start) else {
            return Ok(KeyValue::Empty);
        };
        let to = from.saturating_add_unsigned(VALUE_WINDOW - 1);

        Ok(match backend.key_type(&full_key).await? {
            KeyType::List => KeyValue::List(backend.lrange(&full_key, from, to).await?),
            KeyType::Set => KeyValue::Set(
                backend
                    .smembers(&full_key)
                    .await?
                    .into_iter()
                    .skip(start)
                    .take(VALUE_WINDOW)
                    .collect(),
            ),
            KeyType::ZSet => KeyValue::SortedSet(backend.zrange(&full_key, from, to).await?),
            KeyType::String => match backend.get(&full_key).await? {
                Some(value) => KeyValue::String(value),
                None => KeyValue::Empty,
            },
            KeyType::None | KeyType::Other(_) => KeyValue::Empty,
        })
    }

    /// Every key under the namespace, prefix stripped, sorted.
    pub async fn collections(&self) -> Result<Vec<String>, ResqError> {
        let keys = self
            .internal
            .backend()
            .keys(&self.internal.keys.all_pattern())
            .await?;

        let mut collections: Vec<String> = keys
            .iter()
            .map(|key| self.internal.keys.strip_namespace(key).to_string())
            .collect();
        collections.sort();

        Ok(collections)
    }
}
