use resq::KeyValue;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
pub async fn main() -> Result<(), resq::ResqError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let storage = resq::Storage::builder().build_from_env()?;
    let admin = storage.admin();

    for key in admin.collections().await? {
        let size = admin.get_size_of(&key).await?;
        let kind = match admin.get_value(&key, 0).await? {
            KeyValue::List(_) => "list",
            KeyValue::Set(_) => "set",
            KeyValue::SortedSet(_) => "zset",
            KeyValue::String(_) => "string",
            KeyValue::Empty => "none",
        };
        println!("{key:<40} {kind:<8} {size}");
    }

    for id in storage.worker_registry().workers(true).await? {
        println!("working: {id}");
    }

    println!("failed: {}", storage.failure_store().count().await?);

    Ok(())
}
