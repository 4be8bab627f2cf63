use crate::shared::*;
use resq::stats::{FAILED, PROCESSED};
use testresult::TestResult;

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_counters() -> TestResult {
    let storage = setup();
    let stats = storage.stat_counters();

    assert_eq!(stats.get_stat(PROCESSED).await?, 0);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let stats = stats.clone();
            tokio::spawn(async move { stats.increment(PROCESSED).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(stats.get_stat(PROCESSED).await?, 10);
    assert_eq!(stats.increment_by(FAILED, 5).await?, 5);
    assert_eq!(stats.decrement_by(FAILED, 2).await?, 3);

    stats.clear_stat(PROCESSED).await?;
    assert_eq!(stats.get_stat(PROCESSED).await?, 0);

    storage.flush().await?;

    Ok(())
}
