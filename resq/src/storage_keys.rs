pub(crate) const DEFAULT_NAMESPACE: &str = "resque";

/// Centralizes the Redis key naming scheme shared by every store.
#[derive(Debug, Clone)]
pub(crate) struct StorageKeys {
    /// Namespace prefix applied to every Redis key (`resque` unless configured).
    pub(crate) namespace: String,
    /// Redis set with the name of every queue that has been pushed to.
    pub(crate) queues: String,
    /// Prefix for Redis lists holding serialized job entries
    /// (actual keys look like `{queue_prefix}:<queue>`).
    pub(crate) queue_prefix: String,
    /// Redis set with the id of every registered worker.
    pub(crate) workers: String,
    /// Prefix for the per-worker payload and started-at string keys.
    pub(crate) worker_prefix: String,
    /// Redis list of serialized failure records, oldest first.
    pub(crate) failed: String,
    /// Prefix for integer stat counters (`{stat_prefix}:<name>`).
    pub(crate) stat_prefix: String,
}

impl StorageKeys {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            namespace
        };

        Self {
            queues: format!("{namespace}:queues"),
            queue_prefix: format!("{namespace}:queue"),
            workers: format!("{namespace}:workers"),
            worker_prefix: format!("{namespace}:worker"),
            failed: format!("{namespace}:failed"),
            stat_prefix: format!("{namespace}:stat"),
            namespace,
        }
    }

    pub(crate) fn queue(&self, queue: &str) -> String {
        format!("{}:{}", self.queue_prefix, queue)
    }

    pub(crate) fn worker(&self, id: &str) -> String {
        format!("{}:{}", self.worker_prefix, id)
    }

    pub(crate) fn worker_started(&self, id: &str) -> String {
        format!("{}:{}:started", self.worker_prefix, id)
    }

    pub(crate) fn stat(&self, name: &str) -> String {
        format!("{}:{}", self.stat_prefix, name)
    }

    /// Namespaces an arbitrary key (`failed` -> `resque:failed`).
    pub(crate) fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Pattern matching every key under the namespace.
    pub(crate) fn all_pattern(&self) -> String {
        format!("{}:*", self.namespace)
    }

    pub(crate) fn strip_namespace<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(key)
    }
}
