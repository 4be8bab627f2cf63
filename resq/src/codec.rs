//! JSON encoding of everything written to the backing store.

use serde::{Serialize, de::DeserializeOwned};

use crate::ResqError;

pub(crate) fn encode<T>(value: &T) -> Result<String, ResqError>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string(value)?)
}

/// Decoding a missing value yields `None`, never an error.
pub(crate) fn decode<T>(value: Option<String>) -> Result<Option<T>, ResqError>
where
    T: DeserializeOwned,
{
    match value {
        Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        None => Ok(None),
    }
}
