// src/crawl/mod.rs
// =============================================================================
// This module walks npm's dependents pages.
//
// Features:
// - Reads the dependents tab on the seed package's page
// - Follows "and more..." into the long paginated listing
// - Follows "Next Page" links one page at a time until they run out
// - Optional page limit, and never visits the same page twice
//
// Requests go out strictly one after another.
// =============================================================================

mod pages;

pub use pages::Crawler;
