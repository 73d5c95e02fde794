// src/extract/mod.rs
// =============================================================================
// Pure functions that pull structured data out of npm's HTML pages.
//
// Submodules:
// - meta: the canonical name of the package a page is about
// - tab: the short dependents list on a package page
// - listing: one page of the long, paginated dependents listing
//
// Nothing in here touches the network. When a listing needs another page,
// the extractors hand back the link and crawl.rs decides what to do with it.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// =============================================================================

mod listing;
mod meta;
mod tab;

pub use listing::{parse_listing_page, ListingPage};
pub use meta::extract_source_package_name;
pub use tab::{parse_dependents_tab, DependentsTab};

use scraper::{ElementRef, Html, Selector};

// Builds a selector from a constant CSS string.
// Selector::parse only fails on invalid CSS; every caller passes a literal
// that is known to be valid, so failure here is a programmer error.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("constant CSS selector is valid")
}

// Visible text of an element with surrounding whitespace removed
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// The first `<tag>` element that comes after `anchor` in document order.
//
// "After" includes the anchor's own children, the same way a reader scanning
// the page top to bottom would meet them first.
fn first_following<'a>(document: &'a Html, anchor: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == tag)
}

// All links inside the first list that follows the element matching `anchor_css`
fn links_in_list_after<'a>(document: &'a Html, anchor_css: &'static str) -> Option<Vec<ElementRef<'a>>> {
    let anchor = document.select(&selector(anchor_css)).next()?;
    let list = first_following(document, anchor, "ul")?;
    Some(list.select(&selector("a")).collect())
}
