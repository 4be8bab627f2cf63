use crate::shared::*;
use deadpool_redis::redis::AsyncCommands;
use resq::{JobPayload, KeyType, KeyValue};
use testresult::TestResult;

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_introspection() -> TestResult {
    let storage = setup();
    let admin = storage.admin();
    let queues = storage.queue_store();

    for n in 0..25 {
        queues
            .push("jobs", &JobPayload::new(format!("Job{n}"), vec![]))
            .await?;
    }
    storage.stat_counters().increment_by("processed", 42).await?;

    assert_eq!(
        admin.collections().await?,
        vec!["queue:jobs", "queues", "stat:processed"]
    );

    assert_eq!(admin.key_type("queue:jobs").await?, KeyType::List);
    assert_eq!(admin.get_size_of("queue:jobs").await?, 25);
    let KeyValue::List(items) = admin.get_value("queue:jobs", 0).await? else {
        panic!("expected a list");
    };
    assert_eq!(items.len(), 21);

    assert_eq!(admin.key_type("queues").await?, KeyType::Set);
    assert_eq!(
        admin.get_value("queues", 0).await?,
        KeyValue::Set(vec!["jobs".to_string()])
    );

    assert_eq!(admin.get_size_of("stat:processed").await?, 2);
    assert_eq!(
        admin.get_value("stat:processed", 0).await?,
        KeyValue::String("42".to_string())
    );

    assert_eq!(admin.key_type("missing").await?, KeyType::None);
    assert_eq!(admin.get_value("missing", 0).await?, KeyValue::Empty);

    storage.flush().await?;

    Ok(())
}

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_unrecognised_key_type() -> TestResult {
    let (storage, pool) = setup_with_pool();
    let admin = storage.admin();

    let mut redis = pool.get().await?;
    let key = format!("{}:settings", storage.namespace());
    let _: () = redis.hset(&key, "theme", "dark").await?;

    assert_eq!(
        admin.key_type("settings").await?,
        KeyType::Other("hash".to_string())
    );
    assert_eq!(admin.get_size_of("settings").await?, 0);
    assert_eq!(admin.get_value("settings", 0).await?, KeyValue::Empty);
    assert_eq!(admin.collections().await?, vec!["settings"]);

    storage.flush().await?;

    Ok(())
}
