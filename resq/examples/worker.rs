use resq::{FailureRecord, JobPayload, JobRegistry, WorkerId, WorkerJob};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, thiserror::Error)]
enum JobError {
    #[error("cannot divide {0} by zero")]
    DivideByZero(i64),
}

#[derive(Debug, Serialize, Deserialize, resq::Job)]
#[resq(queue = "math")]
struct Divide {
    a: i64,
    b: i64,
}

impl Divide {
    async fn perform(&self) -> Result<(), JobError> {
        if self.b == 0 {
            return Err(JobError::DivideByZero(self.a));
        }
        tracing::info!(result = self.a / self.b, "Divided");
        Ok(())
    }
}

#[tokio::main]
pub async fn main() -> Result<(), resq::ResqError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let storage = resq::Storage::builder().build_from_env()?;
    let mut registry = JobRegistry::<JobError>::new();
    registry.register::<Divide>();

    storage.enqueue(&Divide { a: 10, b: 2 }).await?;
    storage.enqueue(&Divide { a: 7, b: 0 }).await?;

    let id = WorkerId::current(vec!["math".to_string()]).to_string();
    let workers = storage.worker_registry();
    let queues = storage.queue_store();
    let stats = storage.stat_counters();

    workers.add_worker(&id).await?;
    workers
        .start_worker(&id, &chrono::Utc::now().to_rfc3339())
        .await?;

    while let Some(payload) = queues.pop::<JobPayload>("math").await? {
        workers
            .worker_working_on(&id, &WorkerJob::new("math", payload.clone()))
            .await?;

        let job = registry.build_payload(&payload)?;
        if let Err(err) = job.perform().await {
            let record = FailureRecord::from_error(payload, "math", &id, &err);
            storage.failure_store().save(&record).await?;
            stats.increment(resq::stats::FAILED).await?;
            stats.increment(&format!("{}:{id}", resq::stats::FAILED)).await?;
        }

        stats.increment(resq::stats::PROCESSED).await?;
        stats
            .increment(&format!("{}:{id}", resq::stats::PROCESSED))
            .await?;
        workers.worker_done(&id).await?;
    }

    workers.unregister_worker(&id).await?;

    tracing::info!(
        processed = stats.get_stat(resq::stats::PROCESSED).await?,
        failed = storage.failure_store().count().await?,
        "Queue drained"
    );

    Ok(())
}
