// src/extract/listing.rs
// =============================================================================
// One page of the long dependents listing ("/browse/depended/<name>").
//
// Inside the listing, links come in pairs:
//
//   <a href="/package/foo"><h3>foo</h3></a>     <- package link (has an <h3>)
//   <a href="/~alice">alice</a>                 <- author link (no <h3>)
//
// The pairing is purely positional, so we walk the links with a small state
// machine. A package link that is never followed by its author link is
// dropped when the next package link shows up.
// =============================================================================

use scraper::{ElementRef, Html};
use tracing::{debug, error};

use super::{links_in_list_after, selector, text_of};
use crate::model::Package;

/// Link text of the pagination link
pub const NEXT_PAGE_TEXT: &str = "Next Page";

const LISTING_ROOT: &str = "#main";

#[derive(Debug, Default)]
pub struct ListingPage {
    /// Complete package/author pairs, in page order
    pub packages: Vec<Package>,
    /// href of the first "Next Page" link, if any
    pub next_page: Option<String>,
}

/// What a single link in the listing is
enum Link {
    Package { name: String, href: String },
    Author { name: String, href: String },
}

/// Pairing state between links
enum Pairing {
    Empty,
    PendingAuthor(Package),
}

impl Link {
    fn classify(element: ElementRef<'_>) -> Self {
        let href = element.value().attr("href").unwrap_or_default().to_string();
        match element.select(&selector("h3")).next() {
            Some(heading) => Link::Package {
                name: text_of(heading),
                href,
            },
            None => Link::Author {
                name: text_of(element),
                href,
            },
        }
    }
}

impl Pairing {
    /// Feeds one link in; returns the next state and a package if one completed
    fn advance(self, link: Link, source: Option<&str>) -> (Pairing, Option<Package>) {
        match (self, link) {
            (state, Link::Package { name, href }) => {
                if let Pairing::PendingAuthor(dropped) = state {
                    debug!(package = %dropped.name, "package link without author link, dropping");
                }
                if name.is_empty() {
                    debug!(href = %href, "package link with empty heading, skipping");
                    return (Pairing::Empty, None);
                }
                (Pairing::PendingAuthor(Package::discovered(name, href, source)), None)
            }
            (Pairing::PendingAuthor(mut package), Link::Author { name, href }) => {
                package.author = Some(name);
                package.author_email = Some(href);
                (Pairing::Empty, Some(package))
            }
            (Pairing::Empty, Link::Author { .. }) => (Pairing::Empty, None),
        }
    }
}

pub fn parse_listing_page(document: &Html, source: Option<&str>) -> ListingPage {
    let mut packages = Vec::new();

    match links_in_list_after(document, LISTING_ROOT) {
        Some(links) => {
            let mut state = Pairing::Empty;
            for element in links {
                let (next, completed) = state.advance(Link::classify(element), source);
                state = next;
                packages.extend(completed);
            }
            if let Pairing::PendingAuthor(dropped) = state {
                debug!(package = %dropped.name, "listing ended before author link, dropping");
            }
        }
        None => error!("no dependents listing found on page"),
    }

    ListingPage {
        packages,
        next_page: find_next_page(document),
    }
}

// Only the first "Next Page" link on the page counts
fn find_next_page(document: &Html) -> Option<String> {
    document
        .select(&selector("a"))
        .find(|link| text_of(*link) == NEXT_PAGE_TEXT)
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
}
