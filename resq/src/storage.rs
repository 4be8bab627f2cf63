use serde::Serialize;

use crate::{
    Job,
    admin::Admin,
    error::ResqError,
    failure::FailureStore,
    job_payload::JobPayload,
    queue_store::QueueStore,
    stats::StatCounters,
    storage_builder::StorageBuilder,
    storage_internal::StorageInternal,
    worker_registry::WorkerRegistry,
};

/// Storage is the handle to a namespaced Resque data store.
///
/// It is cheap to clone and hands out one store per concern: queues, workers,
/// failures, stats, and admin introspection. Each store owns its own keys.
/// Storage instances are created using the [`Storage::builder()`] method.
///
/// # Examples
///
/// ```rust,no_run
/// use resq::{JobPayload, Storage};
///
/// async fn example() -> Result<(), resq::ResqError> {
///     let storage = Storage::builder().server("localhost:6379/myapp")?.build()?;
///
///     storage
///         .queue_store()
///         .push("images", &JobPayload::new("ResizeImage", vec![]))
///         .await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Storage {
    pub(crate) internal: StorageInternal,
}

impl Storage {
    /// Creates a new [`StorageBuilder`] for configuring and building a Storage instance.
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Returns the namespace every key of this storage lives under.
    pub fn namespace(&self) -> &str {
        self.internal.namespace()
    }

    pub fn queue_store(&self) -> QueueStore {
        QueueStore::new(self.internal.clone())
    }

    pub fn worker_registry(&self) -> WorkerRegistry {
        WorkerRegistry::new(self.internal.clone())
    }

    pub fn failure_store(&self) -> FailureStore {
        FailureStore::new(self.internal.clone())
    }

    pub fn stat_counters(&self) -> StatCounters {
        StatCounters::new(self.internal.clone())
    }

    pub fn admin(&self) -> Admin {
        Admin::new(self.internal.clone())
    }

    /// Enqueues a typed job on its own queue ([`Job::queue`]).
    ///
    /// # Returns
    ///
    /// The [`JobPayload`] that was pushed, or a [`ResqError`] if the operation fails.
    pub async fn enqueue<T>(&self, job: &T) -> Result<JobPayload, ResqError>
    where
        T: Job + Serialize,
    {
        self.enqueue_to(T::queue(), job).await
    }

    /// Enqueues a typed job on an explicit queue.
    pub async fn enqueue_to<T>(&self, queue: &str, job: &T) -> Result<JobPayload, ResqError>
    where
        T: Job + Serialize,
    {
        let payload = JobPayload::for_job(job)?;

        tracing::trace!(queue, class = payload.class, "Enqueuing job");

        self.queue_store().push(queue, &payload).await?;
        Ok(payload)
    }

    /// Deletes every key under this storage's namespace.
    ///
    /// # Returns
    ///
    /// The number of deleted keys, or a [`ResqError`] if the operation fails.
    pub async fn flush(&self) -> Result<usize, ResqError> {
        self.internal.flush().await
    }
}
