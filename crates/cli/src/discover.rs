// ABOUTME: LinkDiscoverer that finds post URLs by scanning anchors on blog listing pages.
// ABOUTME: Walks paginated listings first, then the common listing paths and the site root.

use std::collections::HashSet;

use blogport_extract::extractors::compiled::get_or_compile;
use blogport_extract::{DocumentSource, LinkDiscoverer};
use scraper::Html;
use url::Url;

/// Listing pages checked after pagination, relative to the site root.
pub const LISTING_PATHS: &[&str] = &["/blog-1", "/blog", "/posts", ""];

/// The listing whose pagination is walked.
pub const PAGINATED_LISTING: &str = "/blog-1";

/// Path fragments that mark a link as a blog post.
pub const POST_PATH_MARKERS: &[&str] = &["/post/", "/blog-1/", "/blog/", "/posts/"];

/// Finds post links on a site's listing pages, fetching through `source`.
pub struct AnchorDiscoverer<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
    max_pages: usize,
}

impl<'a, S: DocumentSource + ?Sized> AnchorDiscoverer<'a, S> {
    pub fn new(source: &'a S, max_pages: usize) -> Self {
        Self { source, max_pages }
    }

    /// Fetches one listing page and returns its post links. Failures are
    /// logged and yield nothing.
    fn links_on(&self, page: &str, base: &Url) -> Vec<String> {
        match self.source.fetch(page) {
            Ok(html) => extract_post_links(&html, base),
            Err(err) => {
                tracing::debug!(error = %err, "listing page unavailable");
                Vec::new()
            }
        }
    }
}

impl<S: DocumentSource + ?Sized> LinkDiscoverer for AnchorDiscoverer<'_, S> {
    fn discover(&self, root: &str) -> Vec<String> {
        let root = root.trim_end_matches('/');
        let base = match Url::parse(root) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(root, error = %e, "cannot discover posts under invalid root");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut add = |links: Vec<String>| -> usize {
            let before = found.len();
            for link in links {
                if seen.insert(link.clone()) {
                    found.push(link);
                }
            }
            found.len() - before
        };

        for page in 1..=self.max_pages {
            let added = pagination_urls(root, page)
                .into_iter()
                .map(|url| self.links_on(&url, &base))
                .find(|links| !links.is_empty())
                .map(&mut add)
                .unwrap_or(0);
            tracing::debug!(page, added, "checked listing page");
            if added == 0 {
                break;
            }
        }

        for path in LISTING_PATHS {
            let listing = format!("{}{}", root, path);
            let added = add(self.links_on(&listing, &base));
            tracing::debug!(listing = %listing, added, "checked listing");
        }

        tracing::info!(root, found = found.len(), "post discovery finished");
        found
    }
}

/// Candidate URLs for page `page` of the paginated listing.
pub fn pagination_urls(root: &str, page: usize) -> Vec<String> {
    let listing = format!("{}{}", root.trim_end_matches('/'), PAGINATED_LISTING);
    vec![
        format!("{}?page={}", listing, page),
        format!("{}/page/{}", listing, page),
    ]
}

/// Absolute, same-host post links in document order, without fragments.
pub fn extract_post_links(html: &str, base: &Url) -> Vec<String> {
    let Some(selector) = get_or_compile("a[href]") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    doc.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .filter(|u| u.host_str() == base.host_str())
        .filter(|u| POST_PATH_MARKERS.iter().any(|m| u.path().contains(m)))
        .map(|mut u| {
            u.set_fragment(None);
            u.to_string()
        })
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use blogport_extract::SourceError;
    use pretty_assertions::assert_eq;

    struct Pages {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl Pages {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl DocumentSource for Pages {
        fn fetch(&self, locator: &str) -> Result<String, SourceError> {
            self.requested.borrow_mut().push(locator.to_string());
            self.pages
                .get(locator)
                .cloned()
                .ok_or_else(|| SourceError::status(locator, 404))
        }
    }

    fn base() -> Url {
        Url::parse("https://site.test").unwrap()
    }

    #[test]
    fn test_extract_post_links_filters() {
        let html = r##"
            <a href="/post/one">One</a>
            <a href="https://site.test/post/two#comments">Two</a>
            <a href="https://other.test/post/three">Elsewhere</a>
            <a href="/about">About</a>
            <a href="mailto:me@site.test">Mail</a>
            <a href="/blog/four">Four</a>
            <a href="/post/one">One again</a>
        "##;
        assert_eq!(
            extract_post_links(html, &base()),
            vec![
                "https://site.test/post/one",
                "https://site.test/post/two",
                "https://site.test/blog/four",
            ]
        );
    }

    #[test]
    fn test_pagination_urls() {
        assert_eq!(
            pagination_urls("https://site.test/", 3),
            vec![
                "https://site.test/blog-1?page=3",
                "https://site.test/blog-1/page/3",
            ]
        );
    }

    #[test]
    fn test_discover_walks_pages_until_nothing_new() {
        let source = Pages::new(&[
            ("https://site.test/blog-1?page=1", r#"<a href="/post/a">a</a>"#),
            ("https://site.test/blog-1/page/2", r#"<a href="/post/b">b</a>"#),
            ("https://site.test/blog-1?page=3", r#"<a href="/post/a">a</a>"#),
            ("https://site.test/blog-1?page=4", r#"<a href="/post/z">z</a>"#),
            ("https://site.test", r#"<a href="/post/c">c</a><a href="/post/a">a</a>"#),
        ]);
        let found = AnchorDiscoverer::new(&source, 10).discover("https://site.test/");
        assert_eq!(
            found,
            vec![
                "https://site.test/post/a",
                "https://site.test/post/b",
                "https://site.test/post/c",
            ]
        );
        let requested = source.requested.borrow();
        assert!(!requested.contains(&"https://site.test/blog-1?page=4".to_string()));
    }

    #[test]
    fn test_discover_respects_max_pages() {
        let source = Pages::new(&[
            ("https://site.test/blog-1?page=1", r#"<a href="/post/a">a</a>"#),
            ("https://site.test/blog-1?page=2", r#"<a href="/post/b">b</a>"#),
        ]);
        let found = AnchorDiscoverer::new(&source, 1).discover("https://site.test");
        assert_eq!(found, vec!["https://site.test/post/a"]);
    }

    #[test]
    fn test_discover_invalid_root() {
        let source = Pages::new(&[]);
        assert!(AnchorDiscoverer::new(&source, 5).discover("not a url").is_empty());
        assert!(source.requested.borrow().is_empty());
    }
}
