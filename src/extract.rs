use crate::filter::UrlFilter;
use scraper::{Html, Selector};
use url::Url;

/// Extracts the internal link targets of a rendered page, in document order
///
/// Only `<a href>` elements are considered. Duplicates are kept; the
/// scheduler decides what is new. Broken markup never fails: html5ever
/// recovers what it can and whatever anchors survive are returned.
pub fn extract_links(html: &str, current_page: &Url, filter: &UrlFilter) -> Vec<Url> {
    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        ::log::debug!(
            "Markup of {} had {} parse errors, extracting what survived",
            current_page,
            doc.errors.len()
        );
    }

    let link_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            ::log::warn!("Link selector failed to compile: {:?}", e);
            return Vec::new();
        }
    };

    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| filter.crawl_target(href, current_page))
        .collect::<Vec<_>>();

    ::log::debug!("Found {} internal links in {}", links.len(), current_page);
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;

    fn extract(html: &str, page: &str) -> Vec<String> {
        let page = Url::parse(page).unwrap();
        let filter = UrlFilter::new(&page, &CheckerConfig::new(page.as_str())).unwrap();
        extract_links(html, &page, &filter)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_internal_links_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/b">B</a>
                <a href="https://example.com/a">A</a>
                <a href="https://elsewhere.org/x">External</a>
                <a href="/b">B again</a>
            </body></html>
        "#;
        assert_eq!(
            extract(html, "https://example.com/"),
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn test_relative_links_resolve_against_current_page() {
        let html = r#"<a href="next.html">Next</a><a href="../up">Up</a>"#;
        assert_eq!(
            extract(html, "https://example.com/docs/page.html"),
            vec!["https://example.com/docs/next.html", "https://example.com/up"]
        );
    }

    #[test]
    fn test_non_anchor_sources_ignored() {
        let html = r#"
            <head>
                <link rel="stylesheet" href="/style.css">
                <script src="/app.js"></script>
            </head>
            <body>
                <form action="/submit"></form>
                <img src="/logo.png">
                <a name="anchor-without-href">No target</a>
                <a href="/real">Real</a>
            </body>
        "#;
        assert_eq!(extract(html, "https://example.com/"), vec!["https://example.com/real"]);
    }

    #[test]
    fn test_skips_non_navigable_schemes() {
        let html = r#"
            <a href="mailto:hi@example.com">Mail</a>
            <a href="tel:+123">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a href="/ok">OK</a>
        "#;
        assert_eq!(extract(html, "https://example.com/"), vec!["https://example.com/ok"]);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let html = r#"<div><a href="/one">one<p><a href="/two"</div></table><<<a href=/three>"#;
        let links = extract(html, "https://example.com/");
        for expected in [
            "https://example.com/one",
            "https://example.com/two",
            "https://example.com/three",
        ] {
            assert!(links.contains(&expected.to_string()), "missing {expected} in {links:?}");
        }
    }

    #[test]
    fn test_empty_and_garbage_content() {
        assert!(extract("", "https://example.com/").is_empty());
        assert!(extract("\u{0}\u{1}not html at all", "https://example.com/").is_empty());
    }
}
