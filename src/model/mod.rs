// src/model/mod.rs
// =============================================================================
// This module holds the records we crawl and persist.
//
// Submodules:
// - package: a package that depends on the seed package
// - author: a maintainer/author of the seed package
//
// Both records share the Record trait below, which turns a loosely-typed
// JSON document (whatever was in data_*.json) back into typed values.
// =============================================================================

mod author;
mod package;

pub use author::Author;
pub use package::Package;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

/// Something we can persist as one element of a JSON array document.
pub trait Record: Serialize + DeserializeOwned {
    /// Human name used in log messages ("package", "author")
    const KIND: &'static str;

    /// Rebuilds records from a generic JSON document.
    ///
    /// Anything that is not an array yields no records. Array items that do
    /// not fit the record shape are skipped one by one, so a single bad entry
    /// does not throw away the rest of the snapshot.
    fn from_documents(document: Value) -> Vec<Self> {
        let items = match document {
            Value::Array(items) => items,
            other => {
                warn!(kind = Self::KIND, found = %json_kind(&other), "expected a JSON array of records");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(kind = Self::KIND, index, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect()
    }
}

impl Record for Package {
    const KIND: &'static str = "package";
}

impl Record for Author {
    const KIND: &'static str = "author";
}

/// Current time as seconds since the Unix epoch, rendered as text.
///
/// This is the format of every `lastCheckedOn` field.
pub fn checked_now() -> String {
    chrono::Utc::now().timestamp().to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_array_document_is_empty() {
        let packages = Package::from_documents(json!({"name": "a"}));
        assert!(packages.is_empty());
        assert!(Author::from_documents(Value::Null).is_empty());
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let packages = Package::from_documents(json!([
            {"name": "good", "url": "/package/good"},
            {"name": 42},
            "not an object",
        ]));
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "good");
    }

    #[test]
    fn test_checked_now_is_epoch_seconds() {
        let now: i64 = checked_now().parse().unwrap();
        assert!(now > 1_600_000_000);
    }
}
