// ABOUTME: Body normalizer that chains the cleanup passes in their fixed order.
// ABOUTME: Re-runs the whole chain on its own output until it stops changing.

use serde::{Deserialize, Serialize};

use super::cleaners::{
    clean_spans, collapse_wrapper_divs, reduce_links, remove_decorative_svgs,
    remove_empty_elements, remove_empty_paragraphs, remove_non_content, strip_attributes,
    tidy_markup, unwrap_bare_figures,
};
use super::tree::Fragment;

/// Maximum number of full normalization rounds.
///
/// Later passes can make an earlier one applicable again (a div whose spans
/// were unwrapped may now have a single child), so the chain is repeated on its
/// serialized output until two rounds agree.
const MAX_ROUNDS: usize = 6;

/// Knobs for body normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Keep `href` on anchors instead of stripping it with the other
    /// attributes (which leaves every link to be unwrapped).
    #[serde(default)]
    pub keep_links: bool,
}

/// Normalizes a post body with default options.
pub fn normalize_content(html: &str) -> String {
    normalize_content_with(html, &NormalizeOptions::default())
}

/// Normalizes a post body into minimal, attribute-free markup.
///
/// The result is a fixed point: normalizing it again returns it unchanged.
/// Every `<img src>` outside a removed subtree survives.
pub fn normalize_content_with(html: &str, opts: &NormalizeOptions) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let mut current = normalize_round(html, opts);
    for round in 1..MAX_ROUNDS {
        let next = normalize_round(&current, opts);
        if next == current {
            tracing::trace!(rounds = round, "body normalization converged");
            return current;
        }
        current = next;
    }
    tracing::debug!(rounds = MAX_ROUNDS, "body normalization hit round cap");
    current
}

fn normalize_round(html: &str, opts: &NormalizeOptions) -> String {
    let mut frag = Fragment::parse(html);

    remove_non_content(&mut frag);
    remove_decorative_svgs(&mut frag);
    strip_attributes(&mut frag, opts.keep_links);
    unwrap_bare_figures(&mut frag);
    collapse_wrapper_divs(&mut frag);
    clean_spans(&mut frag);
    remove_empty_paragraphs(&mut frag);
    reduce_links(&mut frag);
    remove_empty_elements(&mut frag);

    tidy_markup(&frag.to_html())
}
