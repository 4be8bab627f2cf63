use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};

use super::{Backend, KeyType};
use crate::ResqError;

/// [`Backend`] over a pooled Redis connection.
#[derive(Clone)]
pub struct RedisBackend {
    pool: deadpool_redis::Pool,
}

impl RedisBackend {
    pub fn new(pool: deadpool_redis::Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &deadpool_redis::Pool {
        &self.pool
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, ResqError> {
        self.pool
            .get()
            .await
            .map_err(ResqError::DeadpoolRedisPoolError)
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn sadd(&self, key: &str, member: &str) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.sadd(key, member).await?;
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.srem(key, member).await?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, ResqError> {
        let mut redis = self.connection().await?;
        let members: Vec<String> = redis.smembers(key).await?;
        Ok(members)
    }

    async fn sismember(&self, key: &str, member: &str) -> Result<bool, ResqError> {
        let mut redis = self.connection().await?;
        let is_member: bool = redis.sismember(key, member).await?;
        Ok(is_member)
    }

    async fn scard(&self, key: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let count: usize = redis.scard(key).await?;
        Ok(count)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let len: usize = redis.rpush(key, value).await?;
        Ok(len)
    }

    async fn lpop(&self, key: &str) -> Result<Option<String>, ResqError> {
        let mut redis = self.connection().await?;
        let value: Option<String> = redis.lpop(key, None).await?;
        Ok(value)
    }

    async fn llen(&self, key: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let len: usize = redis.llen(key).await?;
        Ok(len)
    }

    async fn lindex(&self, key: &str, index: isize) -> Result<Option<String>, ResqError> {
        let mut redis = self.connection().await?;
        let value: Option<String> = redis.lindex(key, index).await?;
        Ok(value)
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, ResqError> {
        let mut redis = self.connection().await?;
        let values: Vec<String> = redis.lrange(key, start, stop).await?;
        Ok(values)
    }

    async fn lrem(&self, key: &str, count: isize, value: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let removed: usize = redis.lrem(key, count, value).await?;
        Ok(removed)
    }

    async fn lset(&self, key: &str, index: isize, value: &str) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.lset(key, index, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ResqError> {
        let mut redis = self.connection().await?;
        let value: Option<String> = redis.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.set(key, value).await?;
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, ResqError> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let mut redis = self.connection().await?;
        // explicit MGET: the typed helper sends GET for a single key
        let mut cmd = redis::cmd("MGET");
        cmd.arg(keys);
        let values: Vec<Option<String>> = cmd.query_async(&mut redis).await?;
        Ok(values)
    }

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64, ResqError> {
        let mut redis = self.connection().await?;
        let value: i64 = redis.incr(key, by).await?;
        Ok(value)
    }

    async fn exists(&self, key: &str) -> Result<bool, ResqError> {
        let mut redis = self.connection().await?;
        let exists: bool = redis.exists(key).await?;
        Ok(exists)
    }

    async fn del(&self, key: &str) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.del(key).await?;
        Ok(())
    }

    async fn strlen(&self, key: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let len: usize = redis.strlen(key).await?;
        Ok(len)
    }

    async fn key_type(&self, key: &str) -> Result<KeyType, ResqError> {
        let mut redis = self.connection().await?;
        let name: String = redis::cmd("TYPE").arg(key).query_async(&mut redis).await?;
        Ok(KeyType::from_type_name(&name))
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), ResqError> {
        let mut redis = self.connection().await?;
        let _: () = redis.zadd(key, member, score).await?;
        Ok(())
    }

    async fn zcard(&self, key: &str) -> Result<usize, ResqError> {
        let mut redis = self.connection().await?;
        let count: usize = redis.zcard(key).await?;
        Ok(count)
    }

    async fn zrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, ResqError> {
        let mut redis = self.connection().await?;
        let members: Vec<String> = redis.zrange(key, start, stop).await?;
        Ok(members)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, ResqError> {
        let mut redis = self.connection().await?;
        let keys: Vec<String> = redis.keys(pattern).await?;
        Ok(keys)
    }
}
