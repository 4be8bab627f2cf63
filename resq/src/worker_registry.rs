use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

use crate::{
    ResqError, codec,
    job_payload::JobPayload,
    stats::{self, StatCounters},
    storage_internal::StorageInternal,
    storage_types::WorkerState,
};

/// Parsed worker id, `<host>:<pid>:<queue>,<queue>,...`.
///
/// The textual form is shared with every other component that names
/// workers, so [`fmt::Display`] and [`FromStr`] must round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerId {
    pub host: String,
    pub pid: String,
    pub queues: Vec<String>,
}

impl WorkerId {
    pub fn new(host: impl Into<String>, pid: impl ToString, queues: Vec<String>) -> Self {
        Self {
            host: host.into(),
            pid: pid.to_string(),
            queues,
        }
    }

    /// Id for the current process on the local host.
    pub fn current(queues: Vec<String>) -> Self {
        let hostname = gethostname::gethostname().to_string_lossy().to_string();
        Self::new(hostname, std::process::id(), queues)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.pid, self.queues.join(","))
    }
}

impl FromStr for WorkerId {
    type Err = ResqError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let mut parts = id.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(pid), Some(queues)) => Ok(Self {
                host: host.to_string(),
                pid: pid.to_string(),
                queues: queues
                    .split(',')
                    .filter(|queue| !queue.is_empty())
                    .map(str::to_string)
                    .collect(),
            }),
            _ => Err(ResqError::InvalidWorkerId(id.to_string())),
        }
    }
}

/// What a worker is currently processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerJob {
    pub queue: String,
    pub run_at: String,
    pub payload: JobPayload,
}

impl WorkerJob {
    pub fn new(queue: impl Into<String>, payload: JobPayload) -> Self {
        Self {
            queue: queue.into(),
            run_at: chrono::Utc::now().to_rfc3339(),
            payload,
        }
    }
}

/// Worker membership and liveness.
///
/// Owns the `workers` set and the `worker:<id>` / `worker:<id>:started`
/// keys. Whether a worker is working is derived from its payload key on
/// every read.
#[derive(Clone)]
pub struct WorkerRegistry {
    internal: StorageInternal,
}

impl WorkerRegistry {
    pub(crate) fn new(internal: StorageInternal) -> Self {
        Self { internal }
    }

    pub async fn add_worker(&self, id: &str) -> Result<(), ResqError> {
        self.internal
            .backend()
            .sadd(&self.internal.keys.workers, id)
            .await?;

        tracing::debug!(worker = id, "Registered worker");

        Ok(())
    }

    /// Removes the worker, its payload and started-at keys, and its
    /// `processed:<id>` / `failed:<id>` stats.
    ///
    /// Each removal is its own call; a crash part way leaves stale keys.
    pub async fn unregister_worker(&self, id: &str) -> Result<(), ResqError> {
        let backend = self.internal.backend();
        let keys = &self.internal.keys;

        backend.srem(&keys.workers, id).await?;
        backend.del(&keys.worker(id)).await?;
        backend.del(&keys.worker_started(id)).await?;

        let stats = StatCounters::new(self.internal.clone());
        stats.clear_stat(&format!("{}:{id}", stats::PROCESSED)).await?;
        stats.clear_stat(&format!("{}:{id}", stats::FAILED)).await?;

        tracing::debug!(worker = id, "Unregistered worker");

        Ok(())
    }

    /// Records when the worker started; `timestamp` is stored as given.
    pub async fn start_worker(&self, id: &str, timestamp: &str) -> Result<(), ResqError> {
        self.internal
            .backend()
            .set(&self.internal.keys.worker_started(id), timestamp)
            .await
    }

    pub async fn worker_started(&self, id: &str) -> Result<Option<String>, ResqError> {
        self.internal
            .backend()
            .get(&self.internal.keys.worker_started(id))
            .await
    }

    pub async fn worker_working_on<T>(&self, id: &str, data: &T) -> Result<(), ResqError>
    where
        T: Serialize + ?Sized,
    {
        let encoded = codec::encode(data)?;
        self.internal
            .backend()
            .set(&self.internal.keys.worker(id), &encoded)
            .await?;

        tracing::trace!(worker = id, "Worker is working");

        Ok(())
    }

    pub async fn worker_done(&self, id: &str) -> Result<(), ResqError> {
        self.internal
            .backend()
            .del(&self.internal.keys.worker(id))
            .await?;

        tracing::trace!(worker = id, "Worker is done");

        Ok(())
    }

    /// Decoded payload, or an empty map when the worker is idle.
    pub async fn worker_payload(&self, id: &str) -> Result<Map<String, Value>, ResqError> {
        let payload = self
            .internal
            .backend()
            .get(&self.internal.keys.worker(id))
            .await?;
        Ok(codec::decode(payload)?.unwrap_or_default())
    }

    /// Typed payload, `None` when the worker is idle.
    pub async fn worker_job(&self, id: &str) -> Result<Option<WorkerJob>, ResqError> {
        let payload = self
            .internal
            .backend()
            .get(&self.internal.keys.worker(id))
            .await?;
        codec::decode(payload)
    }

    pub async fn worker_state(&self, id: &str) -> Result<WorkerState, ResqError> {
        let working = self
            .internal
            .backend()
            .exists(&self.internal.keys.worker(id))
            .await?;
        Ok(if working {
            WorkerState::Working
        } else {
            WorkerState::Idle
        })
    }

    pub async fn worker_exists(&self, id: &str) -> Result<bool, ResqError> {
        self.internal
            .backend()
            .sismember(&self.internal.keys.workers, id)
            .await
    }

    /// Registered worker ids. With `working_only`, keeps the ids whose
    /// payload key exists, checked with one bulk read.
    pub async fn workers(&self, working_only: bool) -> Result<Vec<String>, ResqError> {
        let backend = self.internal.backend();
        let ids = backend.smembers(&self.internal.keys.workers).await?;

        if !working_only || ids.is_empty() {
            return Ok(ids);
        }

        let payload_keys: Vec<String> = ids.iter().map(|id| self.internal.keys.worker(id)).collect();
        let payloads = backend.mget(&payload_keys).await?;

        Ok(ids
            .into_iter()
            .zip(payloads)
            .filter_map(|(id, payload)| payload.map(|_| id))
            .collect())
    }

    /// The parsed id of a registered worker, `None` if it is not registered.
    pub async fn find_worker(&self, id: &str) -> Result<Option<WorkerId>, ResqError> {
        if self.worker_exists(id).await? {
            Ok(Some(id.parse()?))
        } else {
            Ok(None)
        }
    }

    /// Queues encoded in a worker id.
    pub fn worker_queues(&self, id: &str) -> Result<Vec<String>, ResqError> {
        Ok(id.parse::<WorkerId>()?.queues)
    }
}
