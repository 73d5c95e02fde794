// src/extract/meta.rs
// Works out which package a page belongs to from its og:url meta tag,
// e.g. content="https://www.npmjs.com/package/express" -> "express".

use scraper::Html;
use tracing::error;

use super::selector;

const PACKAGE_SEGMENT: &str = "package/";

pub fn extract_source_package_name(document: &Html) -> Option<String> {
    let name = document
        .select(&selector(r#"meta[property="og:url"]"#))
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(|content| content.split(PACKAGE_SEGMENT).nth(1))
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    if name.is_none() {
        error!("could not determine which package this page is about (no og:url with a package/ segment)");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(head: &str) -> Html {
        Html::parse_document(&format!("<html><head>{}</head><body></body></html>", head))
    }

    #[test]
    fn test_plain_package() {
        let html = page(r#"<meta property="og:url" content="https://x/package/foo">"#);
        assert_eq!(extract_source_package_name(&html), Some("foo".to_string()));
    }

    #[test]
    fn test_scoped_package() {
        let html = page(r#"<meta property="og:url" content="https://www.npmjs.com/package/@babel/core">"#);
        assert_eq!(extract_source_package_name(&html), Some("@babel/core".to_string()));
    }

    #[test]
    fn test_missing_meta() {
        let html = page("<title>No meta</title>");
        assert_eq!(extract_source_package_name(&html), None);
    }

    #[test]
    fn test_meta_without_package_segment() {
        let html = page(r#"<meta property="og:url" content="https://www.npmjs.com/browse/depended/foo">"#);
        assert_eq!(extract_source_package_name(&html), None);

        let html = page(r#"<meta property="og:url" content="https://x/package/">"#);
        assert_eq!(extract_source_package_name(&html), None);

        let html = page(r#"<meta property="og:url">"#);
        assert_eq!(extract_source_package_name(&html), None);
    }
}
