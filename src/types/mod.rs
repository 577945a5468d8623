//! Type definitions

pub mod client;
pub mod deal;
pub mod import;
pub mod instagram;
pub mod messages;
pub mod task;

pub use client::*;
pub use deal::*;
pub use import::*;
pub use instagram::*;
pub use messages::*;
pub use task::*;

use serde::{Deserialize, Deserializer};

/// Deserializes a nullable field of an update request so that an absent key
/// (`None`) can be told apart from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub fn deserialize_patch<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat empty and whitespace-only strings as missing
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
