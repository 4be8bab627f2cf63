//! Key-value primitives the stores are built on.
//!
//! Every key handed to a [`Backend`] is already namespaced. Each call is
//! atomic on its own; nothing here groups calls into transactions.

mod memory;
mod redis;

pub use memory::MemoryBackend;
pub use redis::RedisBackend;

use async_trait::async_trait;

use crate::ResqError;

/// Declared type of a key, as reported by Redis `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    None,
    String,
    List,
    Set,
    ZSet,
    /// Any type the stores do not read (hash, stream, ...).
    Other(String),
}

impl KeyType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "none" => Self::None,
            "string" => Self::String,
            "list" => Self::List,
            "set" => Self::Set,
            "zset" => Self::ZSet,
            other => Self::Other(other.to_string()),
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn sadd(&self, key: &str, member: &str) -> Result<(), ResqError>;

    async fn srem(&self, key: &str, member: &str) -> Result<(), ResqError>;

    async fn smembers(&self, key: &str) -> Result<Vec<String>, ResqError>;

    async fn sismember(&self, key: &str, member: &str) -> Result<bool, ResqError>;

    async fn scard(&self, key: &str) -> Result<usize, ResqError>;

    /// Appends `value` to the tail and returns the new length.
    async fn rpush(&self, key: &str, value: &str) -> Result<usize, ResqError>;

    async fn lpop(&self, key: &str) -> Result<Option<String>, ResqError>;

    async fn llen(&self, key: &str) -> Result<usize, ResqError>;

    async fn lindex(&self, key: &str, index: isize) -> Result<Option<String>, ResqError>;

    /// Inclusive range, negative indexes count from the tail.
    async fn lrange(&self, key: &str, start: isize, stop: isize)
    -> Result<Vec<String>, ResqError>;

    /// Removes elements equal to `value` (`count == 0` removes all of them)
    /// and returns how many were removed.
    async fn lrem(&self, key: &str, count: isize, value: &str) -> Result<usize, ResqError>;

    async fn lset(&self, key: &str, index: isize, value: &str) -> Result<(), ResqError>;

    async fn get(&self, key: &str) -> Result<Option<String>, ResqError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), ResqError>;

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, ResqError>;

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64, ResqError>;

    async fn exists(&self, key: &str) -> Result<bool, ResqError>;

    async fn del(&self, key: &str) -> Result<(), ResqError>;

    async fn strlen(&self, key: &str) -> Result<usize, ResqError>;

    async fn key_type(&self, key: &str) -> Result<KeyType, ResqError>;

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), ResqError>;

    async fn zcard(&self, key: &str) -> Result<usize, ResqError>;

    async fn zrange(&self, key: &str, start: isize, stop: isize)
    -> Result<Vec<String>, ResqError>;

    /// Glob-style key listing (`*` and `?`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, ResqError>;
}
