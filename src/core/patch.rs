//! Partial-update fields for profile and appointment updates.
//!
//! A `Patch<T>` is `None` when the key is absent from the request body,
//! `Some(None)` when it is an explicit `null`, and `Some(Some(value))`
//! otherwise. Absent leaves the stored value alone; `null` clears it.

use serde::{Deserialize, Deserializer};

pub type Patch<T> = Option<Option<T>>;

/// Use with `#[serde(default, deserialize_with = "deserialize_patch")]`.
pub fn deserialize_patch<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn apply<T>(target: &mut Option<T>, patch: Patch<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}

/// Lists are replaced wholesale; `null` empties them.
pub fn apply_list<T>(target: &mut Vec<T>, patch: Patch<Vec<T>>) {
    if let Some(value) = patch {
        *target = value.unwrap_or_default();
    }
}
