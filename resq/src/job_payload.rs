use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Job, ResqError};

/// A queue entry: the job's class name and its positional arguments.
///
/// Serializes as `{"class":...,"args":[...]}`, in that field order, which is
/// the exact form matched by argument-based removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub class: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl JobPayload {
    pub fn new(class: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            class: class.into(),
            args,
        }
    }

    /// Builds the entry for a typed job: the struct fields become the
    /// positional arguments, in declaration order.
    pub fn for_job<T>(job: &T) -> Result<Self, ResqError>
    where
        T: Job + Serialize,
    {
        let args = match serde_json::to_value(job)? {
            Value::Object(fields) => fields.into_values().collect(),
            Value::Array(values) => values,
            Value::Null => vec![],
            value => vec![value],
        };

        Ok(Self::new(T::class_name(), args))
    }
}
