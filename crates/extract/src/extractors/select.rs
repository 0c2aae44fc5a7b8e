// ABOUTME: Generic evaluation of a field's candidate chain against a parsed document.
// ABOUTME: Tries candidates in order and stops at the first value the caller accepts.

//! Selector-chain evaluation.
//!
//! Key behaviors:
//! - Candidates are tried in order; only the first element matching each
//!   candidate selector is inspected.
//! - Text is whitespace-normalized; attributes are trimmed.
//! - Empty values never win. The caller's `accept` predicate can veto more.
//! - The winning candidate's position is reported as its `rank`.

use scraper::{ElementRef, Html};

use crate::extractors::compiled::get_or_compile;
use crate::extractors::profile::{FieldRule, SelectorSpec};

/// A resolved value and the index of the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub rank: usize,
}

/// Collapses runs of whitespace into single spaces and trims.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the first element matching `css`, if the selector is valid.
pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = get_or_compile(css)?;
    doc.select(&selector).next()
}

/// Reads a candidate's raw value from its first matching element.
pub fn read_candidate(doc: &Html, spec: &SelectorSpec, text_fallback: bool) -> Option<String> {
    let css = spec.selector();
    if css.is_empty() {
        return None;
    }
    let el = select_first(doc, css)?;

    let attrs = spec.attributes();
    if attrs.is_empty() {
        if css.starts_with("meta[") {
            return attr_value(&el, "content");
        }
        return element_text(&el);
    }

    attrs
        .iter()
        .find_map(|name| attr_value(&el, name))
        .or_else(|| if text_fallback { element_text(&el) } else { None })
}

/// Evaluates a rule's candidates in order, returning the first non-empty
/// value that `accept` approves.
pub fn resolve_first<F>(doc: &Html, rule: &FieldRule, accept: F) -> Option<Resolution>
where
    F: Fn(&str) -> bool,
{
    rule.selectors.iter().enumerate().find_map(|(rank, spec)| {
        let value = read_candidate(doc, spec, rule.text_fallback)?;
        if accept(&value) {
            Some(Resolution { value, rank })
        } else {
            tracing::debug!(selector = spec.selector(), value = %value, "candidate rejected");
            None
        }
    })
}

fn element_text(el: &ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let normalized = normalize_whitespace(&text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn attr_value(el: &ElementRef<'_>, name: &str) -> Option<String> {
    let value = el.value().attr(name)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
