// ABOUTME: Pre-compiled CSS selector cache shared by all resolvers.
// ABOUTME: Parses each selector string once and hands out clones afterwards.

//! Selector caching for repeated DOM queries.
//!
//! Every document runs the same handful of candidate selectors, so each
//! string is compiled once and reused. Invalid selectors are cached as `None`
//! and simply never match.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for selectors scraper cannot parse.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    if compiled.is_none() {
        tracing::warn!(selector = css, "ignoring invalid CSS selector");
    }
    let mut cache = SELECTOR_CACHE.write().unwrap();
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Compiles a batch of selectors into the cache ahead of extraction.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for css in selectors {
        let _ = get_or_compile(css.as_ref());
    }
}

/// Number of cached selector strings, valid or not.
pub fn cache_size() -> usize {
    SELECTOR_CACHE.read().map(|c| c.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selector_compiles() {
        assert!(get_or_compile("div.post-content > p").is_some());
    }

    #[test]
    fn test_invalid_selector_is_none_and_cached() {
        assert!(get_or_compile("[[[nope").is_none());
        assert!(get_or_compile("[[[nope").is_none());
    }

    #[test]
    fn test_precompile_fills_cache() {
        precompile_selectors([".precompiled-a", ".precompiled-b"]);
        assert!(cache_size() >= 2);
    }
}
