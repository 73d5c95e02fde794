// src/model/package.rs
// =============================================================================
// A package discovered while walking the dependents listing.
//
// Identity is the package name and nothing else: two records with the same
// name are equal even if one came from today's crawl and the other from last
// week's snapshot. That is what lets reconciliation match them up.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::checked_now;

/// Sentinel for "weekly downloads were never fetched"
pub const DOWNLOADS_NOT_FETCHED: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,

    /// Link to the package page, as found in the markup
    #[serde(default)]
    pub url: String,

    /// Packages that listed this one as a dependent
    #[serde(default, alias = "sourced_from")]
    pub sourced_from: Vec<String>,

    /// Packages known to depend on this one (only carried over from old data)
    #[serde(default)]
    pub dependents: Vec<String>,

    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, alias = "author_email")]
    pub author_email: Option<String>,
    #[serde(default)]
    pub last_published: Option<String>,

    #[serde(default = "not_fetched")]
    pub weekly_downloads: i64,

    #[serde(default)]
    pub last_checked_on: String,
}

fn not_fetched() -> i64 {
    DOWNLOADS_NOT_FETCHED
}

impl Package {
    /// Creates a freshly discovered package.
    ///
    /// `source` is the package whose listing we found this one on. When the
    /// source name could not be worked out, provenance is left empty instead
    /// of recording a placeholder.
    pub fn discovered(name: impl Into<String>, url: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sourced_from: source.map(|s| vec![s.to_string()]).unwrap_or_default(),
            dependents: Vec::new(),
            version: None,
            author: None,
            author_email: None,
            last_published: None,
            weekly_downloads: DOWNLOADS_NOT_FETCHED,
            last_checked_on: checked_now(),
        }
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why implement PartialEq by hand?
//    - #[derive(PartialEq)] would compare every field
//    - We want "same name = same package", so we write eq() ourselves
//    - Hash must agree with Eq, so it only hashes the name too
//
// 2. What does #[serde(alias = "...")] do?
//    - Accepts an extra field name when reading JSON
//    - Writing always uses the main (camelCase) name
//
// 3. Why impl Into<String> parameters?
//    - Callers can pass either &str or String
//    - .into() converts to an owned String inside the function
// -----------------------------------------------------------------------------
