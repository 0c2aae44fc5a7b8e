// ABOUTME: Slug derivation for exported post names.
// ABOUTME: slugify is a pure function of the title; SlugAllocator makes slugs unique within a document.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest slug emitted, in characters.
pub const MAX_SLUG_CHARS: usize = 50;

static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Derives a URL slug from a post title.
///
/// Lower-cases, deletes everything outside `[a-z0-9\s-]`, turns whitespace
/// runs into a single hyphen and truncates to [`MAX_SLUG_CHARS`]. The result
/// may be empty or end in a hyphen.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = DISALLOWED_RE.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RE.replace_all(kept.trim(), "-");
    hyphenated.chars().take(MAX_SLUG_CHARS).collect()
}

/// Hands out slugs that are unique within one export document.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for item `post_id`.
    ///
    /// An empty slug becomes `post-{id}`; a taken slug gets `-{id}` appended,
    /// trimming the base so the result stays within [`MAX_SLUG_CHARS`].
    pub fn allocate(&mut self, title: &str, post_id: usize) -> String {
        let base = slugify(title);
        if base.is_empty() {
            return self.claim_with_suffix("post", post_id);
        }
        if self.used.insert(base.clone()) {
            return base;
        }
        self.claim_with_suffix(&base, post_id)
    }

    fn claim_with_suffix(&mut self, base: &str, post_id: usize) -> String {
        let mut attempt = 1;
        loop {
            let suffix = if attempt == 1 {
                format!("-{}", post_id)
            } else {
                format!("-{}-{}", post_id, attempt)
            };
            let room = MAX_SLUG_CHARS.saturating_sub(suffix.len());
            let trimmed: String = base.chars().take(room).collect();
            let candidate = format!("{}{}", trimmed, suffix);
            if self.used.insert(candidate.clone()) {
                if candidate != base {
                    tracing::debug!(slug = %candidate, post_id, "disambiguated slug");
                }
                return candidate;
            }
            attempt += 1;
        }
    }
}
