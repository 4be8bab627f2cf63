use std::{sync::Arc, time::Duration};

use crate::{
    ResqError, Storage,
    backend::{Backend, MemoryBackend, RedisBackend},
    storage_internal::StorageInternal,
};

const DEFAULT_PORT: u16 = 6379;
const DEFAULT_HOST: &str = "localhost";

/// Pool timeouts applied when the builder creates its own Redis pool.
#[derive(Debug, Clone)]
pub struct StorageBuilderTimeouts {
    pub wait: Option<Duration>,
    pub create: Option<Duration>,
    pub recycle: Option<Duration>,
}

impl Default for StorageBuilderTimeouts {
    fn default() -> Self {
        Self {
            wait: Some(Duration::from_secs(2)),
            create: Some(Duration::from_secs(2)),
            recycle: Some(Duration::from_secs(2)),
        }
    }
}

/// Builder for [`Storage`].
///
/// # Examples
///
/// ```rust,no_run
/// use resq::Storage;
///
/// fn example() -> Result<Storage, resq::ResqError> {
///     // `host:port`, `host:port:db`, `host:port/namespace` or a redis:// URL
///     Storage::builder().server("localhost:6379:2")?.build()
/// }
/// ```
pub struct StorageBuilder {
    url: Option<String>,
    namespace: Option<String>,
    timeouts: StorageBuilderTimeouts,
    max_pool_size: usize,
}

impl StorageBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            namespace: None,
            timeouts: StorageBuilderTimeouts::default(),
            max_pool_size: 16,
        }
    }

    /// Sets the key namespace. Defaults to `resque`.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Configures the connection from a server descriptor: `host:port`,
    /// `host:port:db`, `host:port/namespace`, or a full `redis://` URL.
    pub fn server(mut self, server: &str) -> Result<Self, ResqError> {
        let (url, namespace) = parse_server(server)?;
        self.url = Some(url);
        if namespace.is_some() {
            self.namespace = namespace;
        }
        Ok(self)
    }

    /// Reads `REDIS_URL` (required) and `RESQ_NAMESPACE` (optional).
    pub fn from_env(mut self) -> Result<Self, ResqError> {
        let url = std::env::var("REDIS_URL")
            .map_err(|e| ResqError::ConfigError(format!("REDIS_URL: {e}")))?;
        self.url = Some(url);
        if let Ok(namespace) = std::env::var("RESQ_NAMESPACE") {
            self.namespace = Some(namespace);
        }
        Ok(self)
    }

    pub fn timeouts(mut self, timeouts: StorageBuilderTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    pub fn build(self) -> Result<Storage, ResqError> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| ResqError::ConfigError("Redis URL is not configured".to_string()))?;

        let mut cfg = deadpool_redis::Config::from_url(url);
        cfg.pool = Some(deadpool_redis::PoolConfig {
            max_size: self.max_pool_size,
            timeouts: deadpool_redis::Timeouts {
                wait: self.timeouts.wait,
                create: self.timeouts.create,
                recycle: self.timeouts.recycle,
            },
            ..Default::default()
        });
        let pool = cfg.create_pool(Some(deadpool_redis::Runtime::Tokio1))?;

        self.build_from_pool(pool)
    }

    pub fn build_from_env(self) -> Result<Storage, ResqError> {
        self.from_env()?.build()
    }

    /// Builds on a pre-built Redis pool; connection settings are ignored.
    pub fn build_from_pool(self, pool: deadpool_redis::Pool) -> Result<Storage, ResqError> {
        Ok(self.build_with_backend(Arc::new(RedisBackend::new(pool))))
    }

    pub fn build_with_backend(self, backend: Arc<dyn Backend>) -> Storage {
        tracing::debug!(
            namespace = self.namespace.as_deref().unwrap_or_default(),
            "Building storage"
        );

        Storage {
            internal: StorageInternal::new(backend, self.namespace),
        }
    }

    /// Builds on a fresh [`MemoryBackend`].
    pub fn build_in_memory(self) -> Storage {
        self.build_with_backend(Arc::new(MemoryBackend::new()))
    }
}

impl Default for StorageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a server descriptor into a Redis URL and an optional namespace.
fn parse_server(server: &str) -> Result<(String, Option<String>), ResqError> {
    if server.contains("://") {
        return Ok((server.to_string(), None));
    }

    let (server, namespace) = match server.split_once('/') {
        Some((server, namespace)) => (server, Some(namespace.to_string())),
        None => (server, None),
    };

    // extra `:` segments are ignored
    let mut parts = server.split(':');
    let host = match parts.next() {
        Some(host) if !host.is_empty() => host,
        _ => DEFAULT_HOST,
    };
    let port = match parts.next() {
        Some(port) if !port.is_empty() => port
            .parse::<u16>()
            .map_err(|e| ResqError::ConfigError(format!("Invalid port {port}: {e}")))?,
        _ => DEFAULT_PORT,
    };
    let db = match parts.next() {
        Some(db) if !db.is_empty() => Some(
            db.parse::<u32>()
                .map_err(|e| ResqError::ConfigError(format!("Invalid db {db}: {e}")))?,
        ),
        _ => None,
    };

    let url = match db {
        Some(db) => format!("redis://{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}"),
    };

    Ok((url, namespace.filter(|namespace| !namespace.is_empty())))
}
