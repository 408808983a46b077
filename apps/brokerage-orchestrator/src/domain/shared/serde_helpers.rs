//! Serde helpers for loosely-shaped upstream payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default (empty list, empty string, ...).
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
