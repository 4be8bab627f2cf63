use rand::distr::{Alphanumeric, SampleString};
use resq::Storage;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn setup() -> Storage {
    setup_with_pool().0
}

/// Storage on the Redis from `REDIS_URL` under a fresh namespace, plus the
/// pool behind it for raw commands.
pub fn setup_with_pool() -> (Storage, deadpool_redis::Pool) {
    dotenvy::from_filename(".env.test").ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let pool = redis_pool();
    let storage = Storage::builder()
        .namespace(random_string())
        .build_from_pool(pool.clone())
        .expect("Failed to build storage");
    (storage, pool)
}

pub fn redis_pool() -> deadpool_redis::Pool {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL is not set");
    let mut cfg = deadpool_redis::Config::from_url(redis_url);
    cfg.pool = Some(deadpool_redis::PoolConfig {
        max_size: 10,
        timeouts: deadpool_redis::Timeouts {
            wait: Some(std::time::Duration::from_millis(500)),
            create: Some(std::time::Duration::from_millis(500)),
            recycle: Some(std::time::Duration::from_millis(500)),
        },
        ..Default::default()
    });
    cfg.create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("Failed to create Redis pool")
}

pub fn random_string() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 16)
}
