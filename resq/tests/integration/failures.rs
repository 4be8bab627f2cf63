use crate::shared::*;
use resq::{FailureRecord, JobPayload};
use serde_json::json;
use testresult::TestResult;

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_save_and_requeue() -> TestResult {
    let storage = setup();
    let failures = storage.failure_store();
    let queues = storage.queue_store();
    let payload = JobPayload::new("Upload", vec![json!("/tmp/a")]);

    let record = FailureRecord::from_error(payload.clone(), "uploads", "h:1:uploads", &DiskFull);
    failures.save(&record).await?;

    assert_eq!(failures.count().await?, 1);
    let saved = failures.all(0, 1).await?.single();
    assert_eq!(saved.as_ref().map(|r| r.exception.as_str()), Some("DiskFull"));
    assert_eq!(saved.as_ref().map(|r| r.error.as_str()), Some("disk full"));

    assert!(!failures.requeue(3).await?);
    assert_eq!(queues.size("uploads").await?, 0);

    assert!(failures.requeue(0).await?);
    let retried = failures.all(0, 1).await?.single();
    assert!(retried.is_some_and(|r| r.retried_at.is_some()));
    assert_eq!(queues.pop::<JobPayload>("uploads").await?, Some(payload));

    failures.clear().await?;
    assert_eq!(failures.count().await?, 0);

    storage.flush().await?;

    Ok(())
}
