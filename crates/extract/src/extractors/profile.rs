// ABOUTME: Site profile data model: ordered selector candidates for each post field.
// ABOUTME: Profiles are plain serde structs so alternative site layouts can be loaded from JSON.

//! Site profiles.
//!
//! A profile lists, for each field, the places a value may be found, most
//! trusted first. The built-in profile targets the blog layout of the source
//! platform; a JSON file with the same shape replaces it for other layouts.

use serde::{Deserialize, Serialize};

/// Where to look for a value and what to read there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// A CSS selector whose text is read, e.g. `"h1"`. Selectors targeting
    /// `meta[...]` read the `content` attribute instead.
    Css(String),
    /// A CSS selector followed by attribute names tried in order,
    /// e.g. `["time", "datetime", "content"]`.
    CssAttr(Vec<String>),
}

impl Default for SelectorSpec {
    fn default() -> Self {
        SelectorSpec::Css(String::new())
    }
}

impl SelectorSpec {
    pub fn css(selector: impl Into<String>) -> Self {
        SelectorSpec::Css(selector.into())
    }

    pub fn attrs(selector: impl Into<String>, attrs: &[&str]) -> Self {
        let mut parts = vec![selector.into()];
        parts.extend(attrs.iter().map(|a| a.to_string()));
        SelectorSpec::CssAttr(parts)
    }

    /// The CSS selector part of the candidate.
    pub fn selector(&self) -> &str {
        match self {
            SelectorSpec::Css(css) => css,
            SelectorSpec::CssAttr(parts) => parts.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Attribute names to read, in order. Empty means "read text".
    pub fn attributes(&self) -> &[String] {
        match self {
            SelectorSpec::Css(_) => &[],
            SelectorSpec::CssAttr(parts) if parts.len() > 1 => &parts[1..],
            SelectorSpec::CssAttr(_) => &[],
        }
    }
}

/// The ordered candidate chain for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Candidates in priority order.
    #[serde(default)]
    pub selectors: Vec<SelectorSpec>,
    /// For attribute candidates, read the element text when none of the
    /// listed attributes is present.
    #[serde(default)]
    pub text_fallback: bool,
}

impl FieldRule {
    pub fn new(selectors: Vec<SelectorSpec>) -> Self {
        Self {
            selectors,
            text_fallback: false,
        }
    }

    pub fn with_text_fallback(mut self) -> Self {
        self.text_fallback = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// Candidate chains for all four post fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: FieldRule,
    #[serde(default)]
    pub date: FieldRule,
    #[serde(default)]
    pub category: FieldRule,
    #[serde(default)]
    pub body: FieldRule,
}

impl SiteProfile {
    /// Every selector string referenced by the profile.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        [&self.title, &self.date, &self.category, &self.body]
            .into_iter()
            .flat_map(|rule| rule.selectors.iter().map(SelectorSpec::selector))
    }
}
