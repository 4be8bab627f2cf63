//! Named integer counters stored as `stat:<name>` strings.

use crate::{ResqError, storage_internal::StorageInternal};

/// Well-known stat names.
pub const PROCESSED: &str = "processed";
pub const FAILED: &str = "failed";

#[derive(Clone)]
pub struct StatCounters {
    internal: StorageInternal,
}

impl StatCounters {
    pub(crate) fn new(internal: StorageInternal) -> Self {
        Self { internal }
    }

    /// Current value, 0 when the counter was never written.
    pub async fn get_stat(&self, name: &str) -> Result<i64, ResqError> {
        let value = self
            .internal
            .backend()
            .get(&self.internal.keys.stat(name))
            .await?;
        match value {
            Some(value) => value.parse::<i64>().map_err(|e| {
                ResqError::GenericError(format!("Stat {name} is not an integer: {e}"))
            }),
            None => Ok(0),
        }
    }

    pub async fn increment(&self, name: &str) -> Result<i64, ResqError> {
        self.increment_by(name, 1).await
    }

    /// Atomically adds `by`, creating the counter at `by` if absent.
    pub async fn increment_by(&self, name: &str, by: i64) -> Result<i64, ResqError> {
        let value = self
            .internal
            .backend()
            .incr_by(&self.internal.keys.stat(name), by)
            .await?;

        tracing::trace!(stat = name, by, value, "Incremented stat");

        Ok(value)
    }

    pub async fn decrement(&self, name: &str) -> Result<i64, ResqError> {
        self.decrement_by(name, 1).await
    }

    pub async fn decrement_by(&self, name: &str, by: i64) -> Result<i64, ResqError> {
        let by = by.checked_neg().ok_or_else(|| {
            ResqError::GenericError(format!("Cannot decrement stat {name} by {by}"))
        })?;
        self.increment_by(name, by).await
    }

    pub async fn clear_stat(&self, name: &str) -> Result<(), ResqError> {
        self.internal
            .backend()
            .del(&self.internal.keys.stat(name))
            .await
    }
}
