use std::any::type_name;

/// Last path segment of a type name, generic arguments dropped:
/// `app::jobs::Export<app::Csv>` -> `Export`.
pub(crate) fn short_type_name(name: &str) -> &str {
    let base = name.split_once('<').map_or(name, |(base, _)| base);
    base.rsplit("::").next().unwrap_or(base)
}

pub type BoxedJob<ET> = Box<dyn Job<Error = ET>>;

/// A unit of background work, addressed on the wire by its class name.
///
/// Jobs are rebuilt from the positional `args` of a queue entry, so the
/// fields of a job struct are its arguments in declaration order. A job with
/// no arguments must be declared as `struct MyJob {}` (not `struct MyJob;`)
/// so it can be decoded from an empty argument list.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    async fn perform(&self) -> Result<(), Self::Error>;

    /// Class name written into queue entries. Defaults to the last path
    /// segment of the type name.
    fn class_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(type_name::<Self>())
    }

    /// Queue used by [`Storage::enqueue`](crate::Storage::enqueue).
    fn queue() -> &'static str
    where
        Self: Sized,
    {
        "default"
    }
}
