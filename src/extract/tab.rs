// src/extract/tab.rs
// =============================================================================
// The dependents tab on a package page.
//
// npm shows a short inline list of dependents. When there are more than fit,
// the last link in that list reads "and more..." and points at the long,
// paginated listing instead. We report which of the two we found and leave
// following the link to the crawler.
// =============================================================================

use scraper::Html;
use tracing::{debug, error};

use super::{links_in_list_after, text_of};
use crate::model::Package;

/// Link text that marks a truncated dependents list
pub const MORE_MARKER: &str = "and more...";

const TAB_PANEL: &str = "#tabpanel-dependents";

#[derive(Debug, PartialEq)]
pub enum DependentsTab {
    /// No dependents panel (or no list inside it) on this page
    Missing,
    /// The complete list, one package per link
    Inline(Vec<Package>),
    /// The list was cut short; `href` points at the paginated listing
    Truncated { href: String },
}

pub fn parse_dependents_tab(document: &Html, source: Option<&str>) -> DependentsTab {
    let Some(links) = links_in_list_after(document, TAB_PANEL) else {
        error!("no dependents list found on page");
        return DependentsTab::Missing;
    };

    // Only the last link can be the truncation marker
    if let Some(last) = links.last() {
        if text_of(*last) == MORE_MARKER {
            let href = last.value().attr("href").unwrap_or_default().to_string();
            return DependentsTab::Truncated { href };
        }
    }

    let packages = links
        .into_iter()
        .filter_map(|link| {
            let name = text_of(link);
            if name.is_empty() {
                debug!("skipping dependent link without text");
                return None;
            }
            let href = link.value().attr("href").unwrap_or_default();
            Some(Package::discovered(name, href, source))
        })
        .collect();

    DependentsTab::Inline(packages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(items: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div id="tabpanel-dependents"><h2>Dependents</h2><ul>{}</ul></div></body></html>"#,
            items
        ))
    }

    #[test]
    fn test_single_inline_dependent() {
        let html = tab(r#"<li><a href="/package/dep1">dep1</a></li>"#);
        match parse_dependents_tab(&html, Some("foo")) {
            DependentsTab::Inline(packages) => {
                assert_eq!(packages.len(), 1);
                assert_eq!(packages[0].name, "dep1");
                assert_eq!(packages[0].url, "/package/dep1");
                assert_eq!(packages[0].sourced_from, vec!["foo".to_string()]);
                assert!(packages[0].dependents.is_empty());
            }
            other => panic!("expected inline list, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_list() {
        let html = tab(
            r#"<li><a href="/package/dep1">dep1</a></li>
               <li><a href="/package/dep2">dep2</a></li>
               <li><a href="/browse/depended/foo">and more...</a></li>"#,
        );
        assert_eq!(
            parse_dependents_tab(&html, Some("foo")),
            DependentsTab::Truncated {
                href: "/browse/depended/foo".to_string()
            }
        );
    }

    #[test]
    fn test_marker_only_counts_when_last() {
        let html = tab(
            r#"<li><a href="/browse/depended/foo">and more...</a></li>
               <li><a href="/package/dep2">dep2</a></li>"#,
        );
        match parse_dependents_tab(&html, Some("foo")) {
            DependentsTab::Inline(packages) => assert_eq!(packages.len(), 2),
            other => panic!("expected inline list, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_panel() {
        let html = Html::parse_document("<html><body><ul><li><a href='/x'>x</a></li></ul></body></html>");
        assert_eq!(parse_dependents_tab(&html, Some("foo")), DependentsTab::Missing);
    }

    #[test]
    fn test_unknown_source_leaves_provenance_empty() {
        let html = tab(r#"<li><a href="/package/dep1">dep1</a></li>"#);
        match parse_dependents_tab(&html, None) {
            DependentsTab::Inline(packages) => assert!(packages[0].sourced_from.is_empty()),
            other => panic!("expected inline list, got {:?}", other),
        }
    }
}
