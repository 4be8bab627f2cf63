use serde::{Deserialize, Serialize};
use std::any::type_name;

use crate::{
    ResqError, codec, job::short_type_name, job_payload::JobPayload, queue_store::QueueStore,
    storage_internal::StorageInternal, storage_types::ListSlice,
};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Snapshot of a failed job execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub failed_at: String,
    pub payload: JobPayload,
    /// Type name of the error.
    pub exception: String,
    /// Error message.
    pub error: String,
    #[serde(default)]
    pub backtrace: Vec<String>,
    pub worker: String,
    pub queue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retried_at: Option<String>,
}

impl FailureRecord {
    pub fn new(
        payload: JobPayload,
        queue: impl Into<String>,
        worker: impl Into<String>,
        exception: impl Into<String>,
        error: impl Into<String>,
        backtrace: Vec<String>,
    ) -> Self {
        Self {
            failed_at: now_timestamp(),
            payload,
            exception: exception.into(),
            error: error.into(),
            backtrace,
            worker: worker.into(),
            queue: queue.into(),
            retried_at: None,
        }
    }

    /// Captures `err`: its type name, its message, and the messages of its
    /// source chain as the backtrace.
    pub fn from_error<E>(
        payload: JobPayload,
        queue: impl Into<String>,
        worker: impl Into<String>,
        err: &E,
    ) -> Self
    where
        E: std::error::Error,
    {
        let exception = short_type_name(type_name::<E>());

        let mut backtrace = vec![];
        let mut source = err.source();
        while let Some(cause) = source {
            backtrace.push(cause.to_string());
            source = cause.source();
        }

        Self::new(payload, queue, worker, exception, err.to_string(), backtrace)
    }
}

/// Failed job records, kept in the `failed` list until cleared.
#[derive(Clone)]
pub struct FailureStore {
    internal: StorageInternal,
}

impl FailureStore {
    pub(crate) fn new(internal: StorageInternal) -> Self {
        Self { internal }
    }

    /// Appends `record` to the tail of the failure list.
    pub async fn save(&self, record: &FailureRecord) -> Result<(), ResqError> {
        let encoded = codec::encode(record)?;
        self.internal
            .backend()
            .rpush(&self.internal.keys.failed, &encoded)
            .await?;

        tracing::debug!(
            queue = record.queue,
            worker = record.worker,
            class = record.payload.class,
            exception = record.exception,
            "Saved failure"
        );

        Ok(())
    }

    pub async fn count(&self) -> Result<usize, ResqError> {
        self.internal
            .backend()
            .llen(&self.internal.keys.failed)
            .await
    }

    /// Same shapes as [`QueueStore::list_range`]: a count of one returns a
    /// single record and a count of 0 returns none, not the whole list.
    pub async fn all(
        &self,
        start: isize,
        count: usize,
    ) -> Result<ListSlice<FailureRecord>, ResqError> {
        self.internal
            .list_range(&self.internal.keys.failed, start, count)
            .await
    }

    pub async fn clear(&self) -> Result<(), ResqError> {
        self.internal
            .backend()
            .del(&self.internal.keys.failed)
            .await?;

        tracing::debug!("Cleared failures");

        Ok(())
    }

    /// Marks the record at `index` as retried and pushes its original job
    /// back onto its original queue.
    ///
    /// Returns `false`, writing nothing, when there is no record at `index`.
    /// The record update and the push are separate calls: a crash in between
    /// leaves the record marked but the job not requeued.
    pub async fn requeue(&self, index: isize) -> Result<bool, ResqError> {
        let mut record = match self.all(index, 1).await?.single() {
            Some(record) => record,
            None => {
                tracing::warn!(index, "No failure at index, skipping requeue");
                return Ok(false);
            }
        };

        record.retried_at = Some(now_timestamp());
        let encoded = codec::encode(&record)?;
        self.internal
            .backend()
            .lset(&self.internal.keys.failed, index, &encoded)
            .await?;

        let job = JobPayload::new(record.payload.class.clone(), record.payload.args.clone());
        QueueStore::new(self.internal.clone())
            .push(&record.queue, &job)
            .await?;

        tracing::debug!(
            index,
            queue = record.queue,
            class = record.payload.class,
            "Requeued failure"
        );

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::memory_storage;
    use serde_json::json;
    use testresult::TestResult;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct ResetError;

    #[derive(Debug, thiserror::Error)]
    #[error("upload failed")]
    struct UploadError(#[source] ResetError);

    #[derive(Debug, thiserror::Error)]
    #[error("wrapped: {0}")]
    struct Wrapped<E: std::error::Error>(E);

    fn record() -> FailureRecord {
        FailureRecord::new(
            JobPayload::new("Upload", vec![json!("/tmp/a"), json!(3)]),
            "uploads",
            "host:1:uploads",
            "UploadError",
            "upload failed",
            vec!["upload.rs:10".to_string(), "main.rs:3".to_string()],
        )
    }

    #[test]
    fn test_from_error() {
        let record = FailureRecord::from_error(
            JobPayload::new("Upload", vec![]),
            "uploads",
            "host:1:uploads",
            &UploadError(ResetError),
        );

        assert_eq!(record.exception, "UploadError");
        assert_eq!(record.error, "upload failed");
        assert_eq!(record.backtrace, vec!["connection reset"]);
        assert_eq!(record.retried_at, None);
    }

    #[test]
    fn test_from_generic_error() {
        let record = FailureRecord::from_error(
            JobPayload::new("Upload", vec![]),
            "uploads",
            "host:1:uploads",
            &Wrapped(ResetError),
        );

        assert_eq!(record.exception, "Wrapped");
        assert_eq!(record.error, "wrapped: connection reset");
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = now_timestamp();

        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_serialized_form_omits_retried_at() -> TestResult {
        let value = serde_json::to_value(record())?;

        assert!(value.get("retried_at").is_none());
        assert_eq!(value["payload"], json!({"class": "Upload", "args": ["/tmp/a", 3]}));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_all() -> TestResult {
        let failures = memory_storage().failure_store();
        let record = record();

        assert_eq!(failures.count().await?, 0);
        assert_eq!(failures.all(0, 1).await?, ListSlice::Single(None));

        failures.save(&record).await?;

        assert_eq!(failures.count().await?, 1);
        let saved = failures.all(0, 1).await?.single();
        assert_eq!(saved.as_ref(), Some(&record));
        assert_eq!(saved.map(|r| r.backtrace.len()), Some(2));
        assert!(failures.all(0, 0).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_all_keeps_insertion_order() -> TestResult {
        let failures = memory_storage().failure_store();
        for queue in ["a", "b", "c"] {
            let mut record = record();
            record.queue = queue.to_string();
            failures.save(&record).await?;
        }

        let queues: Vec<String> = failures
            .all(0, 10)
            .await?
            .into_vec()
            .into_iter()
            .map(|record| record.queue)
            .collect();
        assert_eq!(queues, vec!["a", "b", "c"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear() -> TestResult {
        let failures = memory_storage().failure_store();
        failures.save(&record()).await?;

        failures.clear().await?;

        assert_eq!(failures.count().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_requeue() -> TestResult {
        let storage = memory_storage();
        let failures = storage.failure_store();
        let queues = storage.queue_store();
        let record = record();
        failures.save(&record).await?;

        assert!(failures.requeue(0).await?);

        assert_eq!(failures.count().await?, 1);
        let retried = failures.all(0, 1).await?.single();
        assert!(retried.as_ref().is_some_and(|r| r.retried_at.is_some()));
        assert_eq!(
            retried.map(|r| r.failed_at),
            Some(record.failed_at.clone())
        );

        assert_eq!(queues.size("uploads").await?, 1);
        assert!(queues.queues().await?.contains(&"uploads".to_string()));
        assert_eq!(
            queues.pop::<JobPayload>("uploads").await?,
            Some(record.payload)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_requeue_out_of_range_is_noop() -> TestResult {
        let storage = memory_storage();
        let failures = storage.failure_store();
        let record = record();
        failures.save(&record).await?;

        assert!(!failures.requeue(5).await?);

        assert_eq!(failures.count().await?, 1);
        assert_eq!(failures.all(0, 1).await?.single(), Some(record));
        assert_eq!(storage.queue_store().size("uploads").await?, 0);
        assert!(storage.queue_store().queues().await?.is_empty());

        Ok(())
    }
}
