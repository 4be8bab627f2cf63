use crate::shared::*;
use resq::{JobPayload, WorkerId, WorkerJob, WorkerState};
use serde_json::json;
use testresult::TestResult;

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_worker_lifecycle() -> TestResult {
    let storage = setup();
    let registry = storage.worker_registry();
    let stats = storage.stat_counters();
    let id = WorkerId::current(vec!["high".to_string(), "low".to_string()]).to_string();

    registry.add_worker(&id).await?;
    registry.start_worker(&id, "2024/01/02 03:04:05").await?;

    assert!(registry.worker_exists(&id).await?);
    assert_eq!(registry.worker_state(&id).await?, WorkerState::Idle);
    assert!(registry.workers(true).await?.is_empty());
    assert_eq!(registry.workers(false).await?, vec![id.clone()]);

    let job = WorkerJob::new("high", JobPayload::new("Klass", vec![json!("x")]));
    registry.worker_working_on(&id, &job).await?;

    assert_eq!(registry.worker_state(&id).await?, WorkerState::Working);
    assert_eq!(registry.workers(true).await?, vec![id.clone()]);
    assert_eq!(registry.worker_job(&id).await?, Some(job));

    stats.increment(&format!("processed:{id}")).await?;
    registry.worker_done(&id).await?;
    assert_eq!(registry.worker_state(&id).await?, WorkerState::Idle);

    let found = registry.find_worker(&id).await?;
    assert_eq!(
        found.map(|worker| worker.queues),
        Some(vec!["high".to_string(), "low".to_string()])
    );

    registry.unregister_worker(&id).await?;

    assert!(!registry.worker_exists(&id).await?);
    assert_eq!(registry.worker_started(&id).await?, None);
    assert_eq!(stats.get_stat(&format!("processed:{id}")).await?, 0);
    assert!(storage.admin().collections().await?.is_empty());

    Ok(())
}
