use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    ResqError, codec, job_payload::JobPayload, storage_internal::StorageInternal,
    storage_types::ListSlice,
};

/// Named FIFO queues of serialized job entries.
///
/// Owns the `queues` registry set and every `queue:<name>` list.
#[derive(Clone)]
pub struct QueueStore {
    internal: StorageInternal,
}

impl QueueStore {
    pub(crate) fn new(internal: StorageInternal) -> Self {
        Self { internal }
    }

    /// Registers the queue, then appends `item` to its tail.
    ///
    /// The two writes are separate calls: a crash in between leaves the
    /// queue registered but without the new item.
    pub async fn push<T>(&self, queue: &str, item: &T) -> Result<(), ResqError>
    where
        T: Serialize + ?Sized,
    {
        let encoded = codec::encode(item)?;
        let backend = self.internal.backend();

        backend.sadd(&self.internal.keys.queues, queue).await?;
        let len = backend
            .rpush(&self.internal.keys.queue(queue), &encoded)
            .await?;

        tracing::trace!(queue, len, "Pushed item");

        Ok(())
    }

    /// Removes and returns the head item. An empty queue stays registered.
    pub async fn pop<T>(&self, queue: &str) -> Result<Option<T>, ResqError>
    where
        T: DeserializeOwned,
    {
        let item = self
            .internal
            .backend()
            .lpop(&self.internal.keys.queue(queue))
            .await?;
        codec::decode(item)
    }

    /// Unregisters the queue, then deletes its list.
    ///
    /// A crash in between leaves a populated list with no registry entry.
    pub async fn remove_queue(&self, queue: &str) -> Result<(), ResqError> {
        let backend = self.internal.backend();

        backend.srem(&self.internal.keys.queues, queue).await?;
        backend.del(&self.internal.keys.queue(queue)).await?;

        tracing::debug!(queue, "Removed queue");

        Ok(())
    }

    /// Every registered queue name, in no particular order.
    pub async fn queues(&self) -> Result<Vec<String>, ResqError> {
        self.internal
            .backend()
            .smembers(&self.internal.keys.queues)
            .await
    }

    pub async fn size(&self, queue: &str) -> Result<usize, ResqError> {
        self.internal
            .backend()
            .llen(&self.internal.keys.queue(queue))
            .await
    }

    /// [`Self::list_range`] over the list of `queue`.
    ///
    /// A `count` of 0 returns nothing, not the whole list.
    pub async fn peek<T>(
        &self,
        queue: &str,
        start: isize,
        count: usize,
    ) -> Result<ListSlice<T>, ResqError>
    where
        T: DeserializeOwned,
    {
        self.internal
            .list_range(&self.internal.keys.queue(queue), start, count)
            .await
    }

    /// Reads `count` items of the list at `key` (relative to the namespace)
    /// starting at `start`. A count of one returns a single item, a count of
    /// 0 returns an empty slice.
    pub async fn list_range<T>(
        &self,
        key: &str,
        start: isize,
        count: usize,
    ) -> Result<ListSlice<T>, ResqError>
    where
        T: DeserializeOwned,
    {
        self.internal
            .list_range(&self.internal.keys.namespaced(key), start, count)
            .await
    }

    /// Removes entries of `class` from `queue` and returns how many went.
    ///
    /// With no `args`, every entry is decoded and each one whose `class`
    /// matches is removed by its exact stored form, one call per match.
    /// With `args`, only entries whose stored form is exactly
    /// `{"class":class,"args":args}` are removed, in a single call.
    pub async fn remove(
        &self,
        queue: &str,
        class: &str,
        args: &[Value],
    ) -> Result<usize, ResqError> {
        let key = self.internal.keys.queue(queue);
        let backend = self.internal.backend();

        let destroyed = if args.is_empty() {
            let mut destroyed = 0;
            for entry in backend.lrange(&key, 0, -1).await? {
                let decoded: Value = serde_json::from_str(&entry)?;
                if decoded.get("class").and_then(Value::as_str) == Some(class) {
                    destroyed += backend.lrem(&key, 0, &entry).await?;
                }
            }
            destroyed
        } else {
            let encoded = codec::encode(&JobPayload::new(class, args.to_vec()))?;
            backend.lrem(&key, 0, &encoded).await?
        };

        tracing::debug!(queue, class, destroyed, "Removed jobs");

        Ok(destroyed)
    }
}
