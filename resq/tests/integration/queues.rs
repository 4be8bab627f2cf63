use crate::shared::*;
use resq::{JobPayload, ListSlice};
use serde::{Deserialize, Serialize};
use serde_json::json;
use testresult::TestResult;

#[derive(Debug, thiserror::Error)]
#[error("mail error")]
struct MailError;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SendEmail {
    to: String,
    retries: u32,
}

#[async_trait::async_trait]
impl resq::Job for SendEmail {
    type Error = MailError;

    async fn perform(&self) -> Result<(), MailError> {
        Ok(())
    }

    fn queue() -> &'static str {
        "mailer"
    }
}

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_push_pop() -> TestResult {
    let storage = setup();
    let queues = storage.queue_store();

    for n in 0..3 {
        queues
            .push("jobs", &JobPayload::new("Klass", vec![json!(n)]))
            .await?;
    }

    assert_eq!(queues.queues().await?, vec!["jobs"]);
    assert_eq!(queues.size("jobs").await?, 3);

    let head: Option<JobPayload> = queues.pop("jobs").await?;
    assert_eq!(head, Some(JobPayload::new("Klass", vec![json!(0)])));

    assert_eq!(
        queues.peek::<JobPayload>("jobs", 0, 1).await?,
        ListSlice::Single(Some(JobPayload::new("Klass", vec![json!(1)])))
    );
    assert_eq!(queues.peek::<JobPayload>("jobs", 0, 10).await?.len(), 2);
    assert_eq!(
        queues.peek::<JobPayload>("jobs", 5, 1).await?,
        ListSlice::Single(None)
    );

    queues.pop::<JobPayload>("jobs").await?;
    queues.pop::<JobPayload>("jobs").await?;
    assert_eq!(queues.pop::<JobPayload>("jobs").await?, None);
    assert_eq!(queues.queues().await?, vec!["jobs"]);

    storage.flush().await?;

    Ok(())
}

#[tokio::test]
#[ignore = "needs Redis at REDIS_URL"]
pub async fn test_enqueue_and_remove() -> TestResult {
    let storage = setup();
    let queues = storage.queue_store();

    storage
        .enqueue(&SendEmail {
            to: "a@example.com".to_string(),
            retries: 1,
        })
        .await?;
    storage
        .enqueue(&SendEmail {
            to: "b@example.com".to_string(),
            retries: 1,
        })
        .await?;
    queues
        .push("mailer", &JobPayload::new("Other", vec![]))
        .await?;

    assert_eq!(queues.size("mailer").await?, 3);

    let removed = queues
        .remove("mailer", "SendEmail", &[json!("a@example.com"), json!(1)])
        .await?;
    assert_eq!(removed, 1);

    let removed = queues.remove("mailer", "SendEmail", &[]).await?;
    assert_eq!(removed, 1);

    let left: Vec<JobPayload> = queues.peek("mailer", 0, 10).await?.into_vec();
    assert_eq!(left, vec![JobPayload::new("Other", vec![])]);

    queues.remove_queue("mailer").await?;
    assert!(queues.queues().await?.is_empty());
    assert_eq!(queues.size("mailer").await?, 0);

    storage.flush().await?;

    Ok(())
}
