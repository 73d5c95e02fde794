// src/crawl/pages.rs
// =============================================================================
// Walks the dependents of a package across as many pages as npm serves.
//
// How it works:
// 1. Read the dependents tab on the package page
// 2. If the list is complete, we're done
// 3. If it ends in "and more...", fetch the long listing instead
// 4. Collect every package on that page, then follow "Next Page"
// 5. Repeat until there is no next page, a fetch fails, or we hit the limit
//
// Pages are processed in a plain loop with an accumulator, so a very long (or
// misbehaving) chain of pages costs memory for results only, never stack.
// =============================================================================

use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::FetchError;
use crate::extract::{extract_source_package_name, parse_dependents_tab, parse_listing_page, DependentsTab, ListingPage};
use crate::model::Package;
use crate::registry::Fetch;

pub struct Crawler<'a, F: Fetch> {
    fetcher: &'a F,
    /// Relative links on npm pages are resolved against this
    base_url: Url,
    /// Stop after this many listing pages (None = follow every page)
    max_pages: Option<usize>,
}

impl<'a, F: Fetch> Crawler<'a, F> {
    pub fn new(fetcher: &'a F, base_url: Url) -> Self {
        Self {
            fetcher,
            base_url,
            max_pages: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// All dependents of the package whose page `document` is.
    ///
    /// A truncated inline list is thrown away in favour of the full listing
    /// it links to.
    pub async fn extract_dependents(&self, document: &Html) -> Vec<Package> {
        let source = extract_source_package_name(document);

        let href = match parse_dependents_tab(document, source.as_deref()) {
            DependentsTab::Missing => return Vec::new(),
            DependentsTab::Inline(packages) => {
                info!(count = packages.len(), "dependents list is complete on the package page");
                return packages;
            }
            DependentsTab::Truncated { href } => href,
        };

        info!(href = %href, "dependents list is truncated, following the full listing");
        let fetched = match self.resolve(&href) {
            Ok(url) => self.fetcher.fetch_text(url.as_str()).await.map(|body| (url, body)),
            Err(e) => Err(e),
        };
        let (origin, body) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                error!(error = %e, "failed to fetch extended dependents");
                return Vec::new();
            }
        };

        let listing = Html::parse_document(&body);
        self.walk_listing(&listing, source.as_deref(), Some(origin)).await
    }

    /// Packages on this listing page and every page after it.
    pub async fn extract_paginated_dependents(&self, document: &Html, source: Option<&str>) -> Vec<Package> {
        self.walk_listing(document, source, None).await
    }

    // `origin` is where `document` was fetched from, if known, so a
    // "Next Page" link back to it counts as already read
    async fn walk_listing(&self, document: &Html, source: Option<&str>, origin: Option<Url>) -> Vec<Package> {
        let mut collected = Vec::new();
        let mut visited: HashSet<Url> = origin.into_iter().collect();
        let mut page_count = 1;
        let mut page = parse_listing_page(document, source);

        loop {
            let ListingPage { packages, next_page } = page;
            debug!(page = page_count, found = packages.len(), "parsed listing page");
            collected.extend(packages);

            let Some(href) = next_page else {
                break;
            };

            if let Some(max) = self.max_pages {
                if page_count >= max {
                    warn!(max_pages = max, "page limit reached, not following further pages");
                    break;
                }
            }

            let url = match self.resolve(&href) {
                Ok(url) => url,
                Err(e) => {
                    error!(error = %e, "bad Next Page link");
                    break;
                }
            };
            if !visited.insert(url.clone()) {
                warn!(url = %url, "Next Page points at a page we already read, stopping");
                break;
            }

            match self.fetcher.fetch_text(url.as_str()).await {
                Ok(body) => {
                    page = parse_listing_page(&Html::parse_document(&body), source);
                    page_count += 1;
                }
                Err(e) => {
                    error!(error = %e, "failed to fetch next page, keeping what we have");
                    break;
                }
            }
        }

        if collected.is_empty() {
            error!("no dependents found, something went wrong");
        } else {
            info!(count = collected.len(), pages = page_count, "collected dependents");
        }
        collected
    }

    // Resolves a possibly-relative link against the registry base URL
    //
    // Examples (base = "https://www.npmjs.com/"):
    //   "/browse/depended/foo" -> "https://www.npmjs.com/browse/depended/foo"
    //   "https://other.com/x"  -> "https://other.com/x"
    fn resolve(&self, href: &str) -> Result<Url, FetchError> {
        self.base_url.join(href).map_err(|source| FetchError::BadLink {
            href: href.to_string(),
            source,
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a loop instead of recursion?
//    - Each "Next Page" is just one more turn of the loop
//    - Recursion would grow the call stack with every page
//    - The accumulator (collected) is the only thing that grows
//
// 2. What is let-else?
//    - let Some(href) = next_page else { break; };
//    - Binds href if there is a next page, otherwise runs the else block
//    - The else block must leave the scope (break, return, continue)
//
// 3. Why HashSet<Url>?
//    - A page that links back to an earlier page would loop forever
//    - insert() returns false when the URL was already there
//
// 4. Why is Crawler generic over F: Fetch?
//    - In main.rs F is HttpFetcher (real network)
//    - In the tests below F is FakeFetcher (canned pages)
//    - The crawl logic is identical in both cases
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::fake::FakeFetcher;

    const BASE: &str = "https://npm.test/";

    fn base() -> Url {
        Url::parse(BASE).unwrap()
    }

    fn package_page(source: &str, items: &str) -> String {
        format!(
            r#"<html><head><meta property="og:url" content="https://npm.test/package/{}"></head>
               <body><div id="tabpanel-dependents"><ul>{}</ul></div></body></html>"#,
            source, items
        )
    }

    fn listing_page(names: &[&str], next: Option<&str>) -> String {
        let items: String = names
            .iter()
            .map(|n| format!(r#"<li><a href="/package/{n}"><h3>{n}</h3></a><a href="/~owner-{n}">owner-{n}</a></li>"#, n = n))
            .collect();
        let footer = next
            .map(|href| format!(r#"<a href="{}">Next Page</a>"#, href))
            .unwrap_or_default();
        format!(r#"<html><body><div id="main"><ul>{}</ul>{}</div></body></html>"#, items, footer)
    }

    fn names(packages: &[Package]) -> Vec<&str> {
        packages.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_inline_list_needs_no_fetch() {
        let fetcher = FakeFetcher::new();
        let crawler = Crawler::new(&fetcher, base());
        let page = Html::parse_document(&package_page("foo", r#"<li><a href="/package/dep1">dep1</a></li>"#));

        let packages = crawler.extract_dependents(&page).await;
        assert_eq!(names(&packages), vec!["dep1"]);
        assert_eq!(packages[0].sourced_from, vec!["foo".to_string()]);
        assert!(packages[0].dependents.is_empty());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_list_follows_listing() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/browse/depended/foo", listing_page(&["x", "y"], None));
        let crawler = Crawler::new(&fetcher, base());
        let page = Html::parse_document(&package_page(
            "foo",
            r#"<li><a href="/package/inline1">inline1</a></li>
               <li><a href="/browse/depended/foo">and more...</a></li>"#,
        ));

        let packages = crawler.extract_dependents(&page).await;
        // The short inline list is replaced by the full listing
        assert_eq!(names(&packages), vec!["x", "y"]);
        assert!(packages.iter().all(|p| p.sourced_from == vec!["foo".to_string()]));
        assert_eq!(packages[0].author.as_deref(), Some("owner-x"));
    }

    #[tokio::test]
    async fn test_truncated_list_fetch_failure_is_empty() {
        let fetcher = FakeFetcher::new();
        let crawler = Crawler::new(&fetcher, base());
        let page = Html::parse_document(&package_page(
            "foo",
            r#"<li><a href="/package/inline1">inline1</a></li>
               <li><a href="/browse/depended/foo">and more...</a></li>"#,
        ));

        assert!(crawler.extract_dependents(&page).await.is_empty());
        assert_eq!(fetcher.requests(), vec!["https://npm.test/browse/depended/foo".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_tab_is_empty() {
        let fetcher = FakeFetcher::new();
        let crawler = Crawler::new(&fetcher, base());
        let page = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert!(crawler.extract_dependents(&page).await.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_collects_every_page() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/browse/depended/foo?offset=2", listing_page(&["c", "d"], Some("/browse/depended/foo?offset=4")))
            .with("https://npm.test/browse/depended/foo?offset=4", listing_page(&["e"], None));
        let crawler = Crawler::new(&fetcher, base());
        let first = Html::parse_document(&listing_page(&["a", "b"], Some("/browse/depended/foo?offset=2")));

        let packages = crawler.extract_paginated_dependents(&first, Some("foo")).await;
        assert_eq!(names(&packages), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_earlier_results() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/p2", listing_page(&["b"], Some("/p3")));
        let crawler = Crawler::new(&fetcher, base());
        let first = Html::parse_document(&listing_page(&["a"], Some("/p2")));

        let packages = crawler.extract_paginated_dependents(&first, Some("foo")).await;
        assert_eq!(names(&packages), vec!["a", "b"]);
        assert_eq!(fetcher.requests(), vec!["https://npm.test/p2".to_string(), "https://npm.test/p3".to_string()]);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/p2", listing_page(&["b"], Some("/p3")))
            .with("https://npm.test/p3", listing_page(&["c"], None));
        let crawler = Crawler::new(&fetcher, base()).with_max_pages(Some(2));
        let first = Html::parse_document(&listing_page(&["a"], Some("/p2")));

        let packages = crawler.extract_paginated_dependents(&first, Some("foo")).await;
        assert_eq!(names(&packages), vec!["a", "b"]);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_stops() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/p2", listing_page(&["b"], Some("/p3")))
            .with("https://npm.test/p3", listing_page(&["c"], Some("/p2")));
        let crawler = Crawler::new(&fetcher, base());
        let first = Html::parse_document(&listing_page(&["a"], Some("/p2")));

        let packages = crawler.extract_paginated_dependents(&first, Some("foo")).await;
        assert_eq!(names(&packages), vec!["a", "b", "c"]);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_next_page_back_to_first_listing_stops() {
        let fetcher = FakeFetcher::new()
            .with("https://npm.test/browse/depended/foo", listing_page(&["a"], Some("/p2")))
            .with("https://npm.test/p2", listing_page(&["b"], Some("/browse/depended/foo")));
        let crawler = Crawler::new(&fetcher, base());
        let page = Html::parse_document(&package_page(
            "foo",
            r#"<li><a href="/browse/depended/foo">and more...</a></li>"#,
        ));

        let packages = crawler.extract_dependents(&page).await;
        assert_eq!(names(&packages), vec!["a", "b"]);
        assert_eq!(
            fetcher.requests(),
            vec!["https://npm.test/browse/depended/foo".to_string(), "https://npm.test/p2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_listing_is_empty() {
        let fetcher = FakeFetcher::new();
        let crawler = Crawler::new(&fetcher, base());
        let first = Html::parse_document(&listing_page(&[], None));
        assert!(crawler.extract_paginated_dependents(&first, Some("foo")).await.is_empty());
    }
}
