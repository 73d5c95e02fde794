// src/registry/api.rs
// =============================================================================
// The three registry API calls we consume:
//
// - GET {downloads_api}/{package}   -> {"downloads": 1234}
// - GET {registry_api}/{package}    -> maintainers + versions
// - GET {registry_api}/{username}   -> per-user download stats (enrichment)
//
// None of these ever fail loudly. A non-2xx answer, a network error, or a
// body in the wrong shape is logged and turned into zero / an empty list, so
// one flaky endpoint cannot sink the whole crawl.
// =============================================================================

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::client::Fetch;
use crate::error::FetchError;
use crate::model::Author;

pub struct RegistryClient<'a, F: Fetch> {
    fetcher: &'a F,
    registry_api_url: String,
    downloads_api_url: String,
}

#[derive(Debug, Deserialize)]
struct DownloadPoint {
    #[serde(default)]
    downloads: i64,
}

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(default)]
    maintainers: Vec<Person>,
    #[serde(default)]
    versions: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: Option<String>,
    email: Option<String>,
}

// Upstream has spelled the dependents counter both ways
#[derive(Debug, Default, Deserialize)]
struct UserDownloads {
    monthly: Option<u64>,
    weekly: Option<u64>,
    #[serde(alias = "depenents")]
    dependents: Option<u64>,
}

impl<'a, F: Fetch> RegistryClient<'a, F> {
    pub fn new(fetcher: &'a F, registry_api_url: &str, downloads_api_url: &str) -> Self {
        Self {
            fetcher,
            registry_api_url: registry_api_url.trim_end_matches('/').to_string(),
            downloads_api_url: downloads_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Downloads over the last week, or 0 when the stats endpoint fails.
    pub async fn fetch_weekly_downloads(&self, package: &str) -> i64 {
        let url = format!("{}/{}", self.downloads_api_url, package);
        let result = self
            .fetcher
            .fetch_json(&url)
            .await
            .and_then(|value| {
                serde_json::from_value::<DownloadPoint>(value).map_err(|source| FetchError::Decode {
                    url: url.clone(),
                    source,
                })
            });

        match result {
            Ok(point) => point.downloads,
            Err(e) => {
                error!(package, error = %e, "failed to fetch weekly downloads");
                0
            }
        }
    }

    /// Maintainers of `package`, with names filled in from version authors.
    pub async fn fetch_maintainers(&self, package: &str) -> Vec<Author> {
        let url = format!("{}/{}", self.registry_api_url, package);
        let packument = match self.fetcher.fetch_json(&url).await {
            Ok(value) => match serde_json::from_value::<Packument>(value) {
                Ok(p) => p,
                Err(e) => {
                    error!(package, error = %e, "registry metadata has an unexpected shape");
                    return Vec::new();
                }
            },
            Err(e) => {
                error!(package, error = %e, "failed to fetch maintainers");
                return Vec::new();
            }
        };

        let mut authors: Vec<Author> = packument
            .maintainers
            .into_iter()
            .map(|m| Author::maintainer(m.name, m.email))
            .collect();

        let version_authors: Vec<Person> = packument
            .versions
            .values()
            .filter_map(|version| version.get("author"))
            .filter_map(|author| serde_json::from_value::<Person>(author.clone()).ok())
            .filter(|person| person.email.is_some())
            .collect();

        confirm_authors(&mut authors, &version_authors);

        info!(package, count = authors.len(), "collected maintainers");
        authors
    }

    /// Fills in per-user download stats for each author with a username.
    ///
    /// Authors whose lookup fails keep their zero defaults.
    pub async fn enrich_authors(&self, authors: &mut [Author]) {
        for author in authors.iter_mut() {
            let Some(username) = author.username.clone() else {
                continue;
            };

            let url = format!("{}/{}", self.registry_api_url, username);
            let value = match self.fetcher.fetch_json(&url).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(username = %username, error = %e, "could not enrich author");
                    continue;
                }
            };

            match user_downloads(&value) {
                Some(stats) => {
                    if let Some(monthly) = stats.monthly {
                        author.monthly_downloads = monthly;
                    }
                    if let Some(weekly) = stats.weekly {
                        author.weekly_downloads = weekly;
                    }
                    if let Some(dependents) = stats.dependents {
                        author.dependents_count = dependents;
                    }
                }
                None => debug!(username = %username, "no download stats in user document"),
            }
        }
    }
}

// Each maintainer takes the name of the first version author sharing its email
fn confirm_authors(authors: &mut [Author], version_authors: &[Person]) {
    for author in authors.iter_mut() {
        let Some(email) = author.email.as_deref() else {
            continue;
        };
        if let Some(person) = version_authors.iter().find(|p| p.email.as_deref() == Some(email)) {
            author.name = person.name.clone();
            author.is_maintainer = false;
        }
    }
}

// The first top-level entry's "downloads" object
fn user_downloads(value: &Value) -> Option<UserDownloads> {
    let (_, first) = value.as_object()?.iter().next()?;
    let downloads = first.get("downloads")?;
    serde_json::from_value(downloads.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::client::fake::FakeFetcher;

    const REGISTRY: &str = "https://registry.test";
    const DOWNLOADS: &str = "https://api.test/downloads/point/last-week";

    #[tokio::test]
    async fn test_weekly_downloads() {
        let fetcher = FakeFetcher::new().with(&format!("{}/express", DOWNLOADS), r#"{"downloads": 31337, "package": "express"}"#);
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);
        assert_eq!(client.fetch_weekly_downloads("express").await, 31337);
    }

    #[tokio::test]
    async fn test_weekly_downloads_failure_is_zero() {
        let fetcher = FakeFetcher::new();
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);
        assert_eq!(client.fetch_weekly_downloads("express").await, 0);

        let fetcher = FakeFetcher::new().with(&format!("{}/express", DOWNLOADS), r#""nope""#);
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);
        assert_eq!(client.fetch_weekly_downloads("express").await, 0);
    }

    #[tokio::test]
    async fn test_maintainers_confirmed_by_version_author() {
        let body = r#"{
            "maintainers": [
                {"name": "alice", "email": "alice@example.com"},
                {"name": "bob", "email": "bob@example.com"}
            ],
            "versions": {
                "1.0.0": {"author": {"name": "Alice Liddell", "email": "alice@example.com"}},
                "1.1.0": {"author": {"name": "Alice L.", "email": "alice@example.com"}},
                "1.2.0": {"author": {"name": "Nobody"}},
                "1.3.0": {}
            }
        }"#;
        let fetcher = FakeFetcher::new().with(&format!("{}/express", REGISTRY), body);
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);

        let authors = client.fetch_maintainers("express").await;
        assert_eq!(authors.len(), 2);

        assert_eq!(authors[0].username.as_deref(), Some("alice"));
        assert_eq!(authors[0].name.as_deref(), Some("Alice Liddell"));
        assert!(!authors[0].is_maintainer);

        assert_eq!(authors[1].username.as_deref(), Some("bob"));
        assert!(authors[1].name.is_none());
        assert!(authors[1].is_maintainer);
        assert!(authors[1].last_checked_on.is_some());
    }

    #[tokio::test]
    async fn test_maintainers_failure_is_empty() {
        let fetcher = FakeFetcher::new();
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);
        assert!(client.fetch_maintainers("express").await.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_authors_tolerates_failures() {
        let fetcher = FakeFetcher::new()
            .with(
                &format!("{}/alice", REGISTRY),
                r#"{"first": {"downloads": {"monthly": 400, "weekly": 100, "depenents": 7}}}"#,
            )
            .with(&format!("{}/carol", REGISTRY), r#"{"first": {"downloads": {"weekly": 3}}}"#);
        let client = RegistryClient::new(&fetcher, REGISTRY, DOWNLOADS);

        let mut authors = vec![
            Author::maintainer(Some("alice".into()), None),
            Author::maintainer(Some("bob".into()), None),
            Author::maintainer(Some("carol".into()), None),
            Author::maintainer(None, None),
        ];
        client.enrich_authors(&mut authors).await;

        assert_eq!(authors[0].monthly_downloads, 400);
        assert_eq!(authors[0].weekly_downloads, 100);
        assert_eq!(authors[0].dependents_count, 7);

        assert_eq!(authors[1].weekly_downloads, 0);

        assert_eq!(authors[2].weekly_downloads, 3);
        assert_eq!(authors[2].monthly_downloads, 0);

        // No username, no request
        assert_eq!(fetcher.requests().len(), 3);
    }
}
