//! Serde helpers for partial-update payloads

use serde::{Deserialize, Deserializer};

/// Three-state field for PATCH-style updates
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// - field absent: `None` (keep the stored value)
/// - `null`: `Some(None)` (clear it)
/// - a value: `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
