// ABOUTME: The four post-field resolvers: title, publish date, category and body.
// ABOUTME: Each runs its profile chain through the shared resolver with its own acceptance test.

//! Field resolvers.
//!
//! Every resolver is total: a miss yields the documented default rather than
//! an error.

use scraper::Html;

use crate::date::normalize_date;
use crate::dom::Fragment;
use crate::extractors::profile::FieldRule;
use crate::extractors::select::{resolve_first, select_first};
use crate::record::PublishDate;

/// Title used when no candidate yields an acceptable value.
pub const UNTITLED: &str = "Untitled Post";

/// Category used when no candidate yields a value.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Shortest title (in characters) that is not treated as chrome.
pub const MIN_TITLE_CHARS: usize = 4;

/// Lower-case prefixes that mark navigation text rather than a post title.
pub const TITLE_BLOCKLIST: &[&str] = &["home", "blog", "menu"];

/// Default body threshold; a candidate must be strictly longer.
pub const MIN_BODY_CHARS: usize = 100;

/// Descendants dropped from a body candidate before it is measured.
pub const BODY_STRIP_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Whether `title` looks like a real post title.
pub fn is_acceptable_title(title: &str) -> bool {
    if title.chars().count() < MIN_TITLE_CHARS {
        return false;
    }
    let lower = title.to_lowercase();
    !TITLE_BLOCKLIST.iter().any(|word| lower.starts_with(word))
}

/// Resolves the post title, or [`UNTITLED`].
pub fn resolve_title(doc: &Html, rule: &FieldRule) -> String {
    match resolve_first(doc, rule, is_acceptable_title) {
        Some(hit) => {
            tracing::debug!(rank = hit.rank, title = %hit.value, "title resolved");
            hit.value
        }
        None => UNTITLED.to_string(),
    }
}

/// Resolves the publish date.
///
/// The first non-empty raw value decides: it is normalized when possible and
/// otherwise kept verbatim.
pub fn resolve_date(doc: &Html, rule: &FieldRule) -> Option<PublishDate> {
    let hit = resolve_first(doc, rule, |_| true)?;
    match normalize_date(&hit.value) {
        Some(instant) => {
            tracing::debug!(rank = hit.rank, %instant, "date resolved");
            Some(PublishDate::Parsed(instant))
        }
        None => {
            tracing::debug!(rank = hit.rank, raw = %hit.value, "date kept unparsed");
            Some(PublishDate::Raw(hit.value))
        }
    }
}

/// Resolves the category, or [`UNCATEGORIZED`].
pub fn resolve_category(doc: &Html, rule: &FieldRule) -> String {
    resolve_first(doc, rule, |_| true)
        .map(|hit| hit.value)
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Resolves the raw post body as serialized HTML, or an empty string.
///
/// Each candidate container is copied without its script/style/nav/header/
/// footer descendants and accepted when the copy is longer than `min_chars`.
pub fn resolve_body(doc: &Html, rule: &FieldRule, min_chars: usize) -> String {
    for (rank, spec) in rule.selectors.iter().enumerate() {
        let Some(el) = select_first(doc, spec.selector()) else {
            continue;
        };
        let html = Fragment::from_element(el, BODY_STRIP_TAGS).to_html();
        let len = html.chars().count();
        if len > min_chars {
            tracing::debug!(rank, selector = spec.selector(), len, "body resolved");
            return html;
        }
        tracing::debug!(selector = spec.selector(), len, "body candidate too short");
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::loader::load_builtin_profile;
    use crate::extractors::profile::SelectorSpec;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn long_text() -> String {
        "Lorem ipsum dolor sit amet. ".repeat(6)
    }

    #[test]
    fn test_title_acceptance() {
        assert!(is_acceptable_title("A Real Post"));
        assert!(!is_acceptable_title("Hi!"));
        assert!(!is_acceptable_title("Home | My Site"));
        assert!(!is_acceptable_title("BLOG posts"));
        assert!(!is_acceptable_title("Menu"));
        assert!(is_acceptable_title("Sunday Brunch"));
    }

    #[test]
    fn test_title_from_heading() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document("<h1>Spring Recipes</h1><h2>Other</h2>");
        assert_eq!(resolve_title(&doc, &profile.title), "Spring Recipes");
    }

    #[test]
    fn test_title_with_inline_markup_keeps_words_whole() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document("<h1>Don<span>'</span>t <em>Stop</em>-Believing</h1>");
        assert_eq!(resolve_title(&doc, &profile.title), "Don't Stop-Believing");
    }

    #[test]
    fn test_category_with_inline_markup() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(
            "<span class=\"post-category\">  Home<b>made</b>\n  Bread </span>",
        );
        assert_eq!(resolve_category(&doc, &profile.category), "Homemade Bread");
    }

    #[test]
    fn test_title_only_home_yields_sentinel() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document("<html><head><title>Home</title></head><body></body></html>");
        assert_eq!(resolve_title(&doc, &profile.title), UNTITLED);
    }

    #[test]
    fn test_title_skips_chrome_heading() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(
            "<html><head><title>Gardening in May</title></head><body><h1>Blog</h1></body></html>",
        );
        assert_eq!(resolve_title(&doc, &profile.title), "Gardening in May");
    }

    #[test]
    fn test_title_og_fallback() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="From Open Graph"></head><body></body></html>"#,
        );
        assert_eq!(resolve_title(&doc, &profile.title), "From Open Graph");
    }

    #[test]
    fn test_date_from_datetime_attribute() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(r#"<time datetime="2023-05-01T10:30:00Z">May 1</time>"#);
        assert_eq!(
            resolve_date(&doc, &profile.date),
            Some(PublishDate::Parsed(
                Utc.with_ymd_and_hms(2023, 5, 1, 10, 30, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_date_text_fallback() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(r#"<span class="post-date">March 3, 2021</span>"#);
        assert_eq!(
            resolve_date(&doc, &profile.date),
            Some(PublishDate::Parsed(
                Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_date_keeps_raw_when_unparseable() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(r#"<span class="date">3 days ago</span>"#);
        assert_eq!(
            resolve_date(&doc, &profile.date),
            Some(PublishDate::Raw("3 days ago".to_string()))
        );
    }

    #[test]
    fn test_date_meta_content() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document(
            r#"<html><head><meta property="article:published_time" content="2020-02-02"></head></html>"#,
        );
        assert_eq!(
            resolve_date(&doc, &profile.date),
            Some(PublishDate::Parsed(
                Utc.with_ymd_and_hms(2020, 2, 2, 0, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_date_missing() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document("<p>No dates here</p>");
        assert_eq!(resolve_date(&doc, &profile.date), None);
    }

    #[test]
    fn test_category_default_and_hit() {
        let profile = load_builtin_profile();
        let none = Html::parse_document("<p>nothing</p>");
        assert_eq!(resolve_category(&none, &profile.category), UNCATEGORIZED);

        let doc = Html::parse_document(r#"<a class="tag"> Travel </a><span class="category">Food</span>"#);
        assert_eq!(resolve_category(&doc, &profile.category), "Food");
    }

    #[test]
    fn test_body_strips_chrome_and_keeps_container() {
        let profile = load_builtin_profile();
        let html = format!(
            r#"<article><nav>menu</nav><p>{}</p><script>var x;</script></article>"#,
            long_text()
        );
        let doc = Html::parse_document(&html);
        let body = resolve_body(&doc, &profile.body, MIN_BODY_CHARS);
        assert!(body.starts_with("<article><p>"));
        assert!(!body.contains("<nav>"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_body_skips_short_candidates() {
        let rule = FieldRule::new(vec![SelectorSpec::css(".post-content"), SelectorSpec::css("main")]);
        let html = format!(
            r#"<main><div class="post-content">short</div><p>{}</p></main>"#,
            long_text()
        );
        let doc = Html::parse_document(&html);
        let body = resolve_body(&doc, &rule, MIN_BODY_CHARS);
        assert!(body.starts_with("<main>"));
    }

    #[test]
    fn test_body_exhaustion_is_empty() {
        let profile = load_builtin_profile();
        let doc = Html::parse_document("<article><p>tiny</p></article>");
        assert_eq!(resolve_body(&doc, &profile.body, MIN_BODY_CHARS), "");
    }
}
