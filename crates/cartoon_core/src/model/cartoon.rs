//! Cartoon character record and its remote JSON shape.
//!
//! # Responsibility
//! - Define the record persisted by the local store.
//! - Normalize loosely-typed remote objects into that record.
//!
//! # Invariants
//! - Missing, `null` or non-string source fields become `""`.
//! - Records are never updated in place after insert.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Store-assigned record identity (SQLite rowid).
pub type CartoonId = i64;

/// A record ready to be inserted; identity is not known yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartoon {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub species: String,
    /// Serialized as `image` to match the remote payload.
    #[serde(rename = "image", default, deserialize_with = "lenient_text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
}

impl NewCartoon {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cartoon {
    pub id: CartoonId,
    pub name: String,
    pub species: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub status: String,
}

impl Cartoon {
    /// Text shown for this record in a list row.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(text),
        _ => Ok(String::new()),
    }
}
