// src/model/author.rs
// =============================================================================
// A maintainer or author of the seed package.
//
// Authors start life as entries in the registry's `maintainers` list. When a
// published version names the same person (matched by email) as its author,
// we take the display name from there and stop calling them a bare maintainer.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::checked_now;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub name: Option<String>,
    /// npm account name, the key for enrichment lookups
    pub username: Option<String>,
    pub email: Option<String>,
    pub package_count: u64,
    pub last_checked_on: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    #[serde(alias = "is_maintainer")]
    pub is_maintainer: bool,
    pub monthly_downloads: u64,
    pub weekly_downloads: u64,
    #[serde(alias = "depenents")]
    pub dependents_count: u64,
}

impl Author {
    /// An entry straight from the registry's maintainer list.
    pub fn maintainer(username: Option<String>, email: Option<String>) -> Self {
        Self {
            username,
            email,
            last_checked_on: Some(checked_now()),
            is_maintainer: true,
            ..Self::default()
        }
    }
}
