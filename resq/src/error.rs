use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResqError {
    #[error("Generic error: {0}")]
    GenericError(String),

    #[error("Redis error: {0}")]
    RedisError(#[from] deadpool_redis::redis::RedisError),

    #[error("Redis pool error: {0}")]
    DeadpoolRedisPoolError(#[from] deadpool_redis::PoolError),

    #[error("Redis pool creation error: {0}")]
    DeadpoolRedisCreatePoolError(#[from] deadpool_redis::CreatePoolError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid worker id: {0}")]
    InvalidWorkerId(String),

    #[error("Job class {0} not registered")]
    JobNotRegistered(String),

    #[error("Job factory error: {0}")]
    JobFactoryError(String),
}
