// ABOUTME: Collaborator traits for obtaining documents and discovering post locators.
// ABOUTME: Implementations live outside the core; tests use in-memory ones.

use std::collections::HashSet;

use crate::error::SourceError;

/// Produces the raw HTML for a locator.
pub trait DocumentSource {
    fn fetch(&self, locator: &str) -> Result<String, SourceError>;
}

/// Yields candidate post locators under a root locator.
///
/// Duplicates are allowed; callers deduplicate.
pub trait LinkDiscoverer {
    fn discover(&self, root: &str) -> Vec<String>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn fetch(&self, locator: &str) -> Result<String, SourceError> {
        (**self).fetch(locator)
    }
}

impl<T: LinkDiscoverer + ?Sized> LinkDiscoverer for &T {
    fn discover(&self, root: &str) -> Vec<String> {
        (**self).discover(root)
    }
}

/// Removes duplicate locators, keeping the first occurrence of each.
pub fn dedupe_locators<I, S>(locators: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    locators
        .into_iter()
        .map(Into::into)
        .filter(|l| seen.insert(l.clone()))
        .collect()
}
