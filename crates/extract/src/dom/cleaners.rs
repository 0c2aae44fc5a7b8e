// ABOUTME: Individual cleanup passes that reduce a post body to portable markup.
// ABOUTME: Each pass mutates a Fragment in place; tidy_markup is the final string-level sweep.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tree::Fragment;

/// Elements removed together with their subtree.
pub const STRIP_TAGS: &[&str] = &["script", "style", "button", "nav", "header", "footer"];

/// Attributes an `<img>` keeps; everything else is dropped.
pub const IMAGE_ATTRS: &[&str] = &["src", "alt", "title", "width", "height", "srcset", "loading"];

/// Child elements that make a wrapper div safe to dissolve.
pub const MEANINGFUL_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "figure", "img", "ul", "ol", "blockquote", "strong",
    "em", "a",
];

/// Elements that are content even when they hold no text.
pub const CONTENT_VOID_TAGS: &[&str] = &["img", "br", "hr"];

/// Upper bound on wrapper-collapse passes. Deeply malformed input may stop
/// short of a fixed point.
pub const MAX_COLLAPSE_PASSES: usize = 15;

/// A div with more children than this is treated as real layout.
pub const MAX_WRAPPER_CHILDREN: usize = 5;

static EMPTY_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<span>\s*</span>").unwrap());
static SPAN_BR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<span>\s*<br\s*/?>\s*</span>").unwrap());
static BR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<br\s*/?>(?:\s*<br\s*/?>){2,}").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());
static EMPTY_P_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<p>\s*</p>").unwrap());

/// Removes script, style, button, nav, header and footer subtrees.
pub fn remove_non_content(frag: &mut Fragment) -> usize {
    let mut removed = 0;
    for id in frag.element_ids() {
        let strip = frag.element(id).is_some_and(|el| el.is_any(STRIP_TAGS));
        if strip && frag.is_attached(id) && frag.remove(id) {
            removed += 1;
        }
    }
    removed
}

/// Removes `<svg>` elements without an `alt` attribute.
pub fn remove_decorative_svgs(frag: &mut Fragment) -> usize {
    let mut removed = 0;
    for id in frag.elements_named("svg") {
        let decorative = frag.element(id).is_some_and(|el| !el.has_attr("alt"));
        if decorative && frag.is_attached(id) && frag.remove(id) {
            removed += 1;
        }
    }
    removed
}

/// Drops every attribute except the image whitelist on `<img>`.
///
/// With `keep_links`, anchors keep their `href`.
pub fn strip_attributes(frag: &mut Fragment, keep_links: bool) {
    for id in frag.element_ids() {
        frag.update_element(id, |el| {
            if el.is("img") {
                el.retain_attrs(IMAGE_ATTRS);
            } else if keep_links && el.is("a") {
                el.retain_attrs(&["href"]);
            } else {
                el.attrs.clear();
            }
        });
    }
}

/// Unwraps `<figure>` elements that hold no image.
pub fn unwrap_bare_figures(frag: &mut Fragment) -> usize {
    let mut unwrapped = 0;
    for id in frag.elements_named("figure") {
        if frag.is_attached(id) && !frag.has_descendant_tag(id, &["img"]) && frag.unwrap(id) {
            unwrapped += 1;
        }
    }
    unwrapped
}

/// True when a div is a vacuous wrapper: few children, and either a single
/// child or at least one meaningful child element.
fn is_collapsible_div(frag: &Fragment, id: ego_tree::NodeId) -> bool {
    let node = match frag.get(id) {
        Some(n) => n,
        None => return false,
    };
    let count = node.children().count();
    if count > MAX_WRAPPER_CHILDREN {
        return false;
    }
    count == 1
        || node.children().any(|c| {
            c.value()
                .as_element()
                .is_some_and(|el| el.is_any(MEANINGFUL_TAGS))
        })
}

/// Dissolves wrapper divs until a pass makes no change or the pass cap is hit.
///
/// Divs are visited in document order, so an outer wrapper is judged before
/// its inner divs hand it their children. Returns the number of passes run.
pub fn collapse_wrapper_divs(frag: &mut Fragment) -> usize {
    let mut passes = 0;
    while passes < MAX_COLLAPSE_PASSES {
        passes += 1;
        let mut changed = 0;
        for id in frag.elements_named("div") {
            if frag.is_attached(id) && is_collapsible_div(frag, id) && frag.unwrap(id) {
                changed += 1;
            }
        }
        tracing::trace!(pass = passes, unwrapped = changed, "wrapper collapse pass");
        if changed == 0 {
            break;
        }
    }
    passes
}

/// Removes spans holding only whitespace and unwraps spans without a
/// `style` or `class` attribute.
pub fn clean_spans(frag: &mut Fragment) {
    for id in frag.elements_named("span") {
        if !frag.is_attached(id) {
            continue;
        }
        if frag.has_blank_text(id) && !frag.has_descendant_tag(id, CONTENT_VOID_TAGS) {
            frag.remove(id);
            continue;
        }
        let styled = frag
            .element(id)
            .is_some_and(|el| el.has_attr("style") || el.has_attr("class"));
        if !styled {
            frag.unwrap(id);
        }
    }
}

/// Removes paragraphs with no visible text and no image.
pub fn remove_empty_paragraphs(frag: &mut Fragment) -> usize {
    let mut removed = 0;
    for id in frag.elements_named("p") {
        if frag.is_attached(id)
            && frag.has_blank_text(id)
            && !frag.has_descendant_tag(id, &["img"])
            && frag.remove(id)
        {
            removed += 1;
        }
    }
    removed
}

/// Reduces anchors to their `href`; anchors without one are unwrapped.
pub fn reduce_links(frag: &mut Fragment) {
    for id in frag.elements_named("a") {
        if !frag.is_attached(id) {
            continue;
        }
        let has_href = frag.element(id).is_some_and(|el| el.has_attr("href"));
        if has_href {
            frag.update_element(id, |el| el.retain_attrs(&["href"]));
        } else {
            frag.unwrap(id);
        }
    }
}

/// Removes elements with no text and no img/br/hr inside them.
pub fn remove_empty_elements(frag: &mut Fragment) -> usize {
    let mut removed = 0;
    for id in frag.element_ids() {
        if !frag.is_attached(id) {
            continue;
        }
        let keep = frag
            .element(id)
            .is_some_and(|el| el.is_any(CONTENT_VOID_TAGS));
        if !keep
            && frag.has_blank_text(id)
            && !frag.has_descendant_tag(id, CONTENT_VOID_TAGS)
            && frag.remove(id)
        {
            removed += 1;
        }
    }
    removed
}

/// String-level cleanup on serialized markup.
pub fn tidy_markup(html: &str) -> String {
    let out = EMPTY_SPAN_RE.replace_all(html, "");
    let out = SPAN_BR_RE.replace_all(&out, "<br />");
    let out = BR_RUN_RE.replace_all(&out, "<br /><br />");
    let out = BLANK_LINES_RE.replace_all(&out, "\n\n");
    let out = EMPTY_P_RE.replace_all(&out, "");
    out.trim().to_string()
}
