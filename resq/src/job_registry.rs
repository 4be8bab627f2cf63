use serde_json::Value;
use std::collections::HashMap;

use crate::error::ResqError;
use crate::job::{BoxedJob, Job};
use crate::job_payload::JobPayload;

type JobFactory<ET> = fn(Vec<Value>) -> Result<BoxedJob<ET>, ResqError>;

/// Maps class names to constructors, so queue entries can be turned back
/// into runnable jobs.
pub struct JobRegistry<ET> {
    jobs: HashMap<String, JobFactory<ET>>,
}

pub fn job_factory<T, ET>(args: Vec<Value>) -> Result<BoxedJob<ET>, ResqError>
where
    T: Job<Error = ET> + serde::de::DeserializeOwned + 'static,
{
    let job: T = serde_json::from_value(Value::Array(args))?;
    Ok(Box::new(job))
}

impl<ET> JobRegistry<ET> {
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
        }
    }

    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Job<Error = ET> + serde::de::DeserializeOwned + 'static,
    {
        self.jobs
            .insert(T::class_name().to_string(), job_factory::<T, ET>);
        self
    }

    pub fn register_with(&mut self, class: impl Into<String>, factory: JobFactory<ET>) {
        self.jobs.insert(class.into(), factory);
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.jobs.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_registered<T>(&self) -> bool
    where
        T: Job<Error = ET>,
    {
        self.jobs.contains_key(T::class_name())
    }

    /// Builds the job registered under `class` from positional `args`.
    ///
    /// Dashed names are camel-cased first (`send-email` -> `SendEmail`) and
    /// a leading `::` is ignored.
    pub fn build(&self, class: &str, args: Vec<Value>) -> Result<BoxedJob<ET>, ResqError> {
        let name = normalize_class_name(class);
        let factory = self
            .jobs
            .get(&name)
            .ok_or_else(|| ResqError::JobNotRegistered(name.clone()))?;
        match factory(args) {
            Ok(job) => Ok(job),
            Err(e) => Err(ResqError::JobFactoryError(format!(
                "Failed to build job {name}: {e}"
            ))),
        }
    }

    pub fn build_payload(&self, payload: &JobPayload) -> Result<BoxedJob<ET>, ResqError> {
        self.build(&payload.class, payload.args.clone())
    }
}

impl<ET> Default for JobRegistry<ET> {
    fn default() -> Self {
        Self::new()
    }
}

/// `job-name` -> `JobName`.
fn classify(dashed: &str) -> String {
    dashed
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn normalize_class_name(class: &str) -> String {
    let class = class.strip_prefix("::").unwrap_or(class);
    if class.contains('-') {
        classify(class)
    } else {
        class.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};
    use testresult::TestResult;

    static TOTAL: AtomicU64 = AtomicU64::new(0);

    #[derive(Debug, thiserror::Error)]
    #[error("job error")]
    struct JobError;

    #[derive(Serialize, Deserialize)]
    struct AddNumbers {
        a: u64,
        b: u64,
    }

    #[async_trait::async_trait]
    impl Job for AddNumbers {
        type Error = JobError;

        async fn perform(&self) -> Result<(), JobError> {
            TOTAL.fetch_add(self.a + self.b, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Serialize, Deserialize)]
    struct SendEmail {}

    #[async_trait::async_trait]
    impl Job for SendEmail {
        type Error = JobError;

        async fn perform(&self) -> Result<(), JobError> {
            Ok(())
        }
    }

    fn registry() -> JobRegistry<JobError> {
        let mut registry = JobRegistry::new();
        registry.register::<AddNumbers>().register::<SendEmail>();
        registry
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("job-name"), "JobName");
        assert_eq!(classify("send-email-now"), "SendEmailNow");
        assert_eq!(normalize_class_name("::Archive"), "Archive");
        assert_eq!(normalize_class_name("Archive"), "Archive");
    }

    #[test]
    fn test_registered() {
        let registry = registry();

        assert!(registry.has_registered::<AddNumbers>());
        let mut names = registry.class_names();
        names.sort();
        assert_eq!(names, vec!["AddNumbers", "SendEmail"]);
    }

    #[tokio::test]
    async fn test_build_and_perform() -> TestResult {
        let registry = registry();

        let job = registry.build_payload(&JobPayload::new("AddNumbers", vec![json!(2), json!(3)]))?;
        job.perform().await?;
        assert_eq!(TOTAL.load(Ordering::SeqCst), 5);

        registry.build("send-email", vec![])?;
        registry.build("::SendEmail", vec![])?;

        Ok(())
    }

    #[test]
    fn test_build_unknown_class() {
        assert!(matches!(
            registry().build("Missing", vec![]),
            Err(ResqError::JobNotRegistered(name)) if name == "Missing"
        ));
    }

    #[test]
    fn test_build_with_bad_args() {
        assert!(matches!(
            registry().build("AddNumbers", vec![json!("x")]),
            Err(ResqError::JobFactoryError(_))
        ));
    }
}
