use rand::distr::{Alphanumeric, SampleString};

use crate::Storage;

pub fn random_string() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 16)
}

/// In-memory storage under a fresh random namespace.
pub fn memory_storage() -> Storage {
    Storage::builder().namespace(random_string()).build_in_memory()
}
