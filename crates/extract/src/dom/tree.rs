// ABOUTME: Owned arena tree for HTML fragments, built from scraper's parse output.
// ABOUTME: Supports in-place unwrap/remove by NodeId and serializes back to minimal HTML.

use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use scraper::{ElementRef, Html, Node};

/// Elements that never carry children and serialize as `<tag />`.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// An element's name and attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Keeps only the attributes named in `allowed`, reordered to match it.
    pub fn retain_attrs(&mut self, allowed: &[&str]) {
        let mut kept = Vec::with_capacity(allowed.len());
        for name in allowed {
            if let Some(pos) = self
                .attrs
                .iter()
                .position(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                kept.push(self.attrs.swap_remove(pos));
            }
        }
        self.attrs = kept;
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn is_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.is(t))
    }
}

impl From<&scraper::node::Element> for ElementData {
    fn from(el: &scraper::node::Element) -> Self {
        Self {
            name: el.name().to_ascii_lowercase(),
            attrs: el
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// A node in a fragment tree. Comments and doctypes are dropped on import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Root,
    Element(ElementData),
    Text(String),
}

impl FragmentNode {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            FragmentNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            FragmentNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An HTML fragment held in an arena, owned by exactly one writer.
///
/// Adjacent text nodes are merged after every structural edit so the tree
/// matches what a fresh parse of its own serialization would produce.
#[derive(Debug, Clone)]
pub struct Fragment {
    tree: Tree<FragmentNode>,
}

impl Fragment {
    /// Parses an HTML fragment (body context).
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_fragment(html);
        let mut tree = Tree::new(FragmentNode::Root);
        copy_children(*parsed.root_element(), &mut tree.root_mut(), &[]);
        let mut frag = Self { tree };
        frag.merge_all_text();
        frag
    }

    /// Copies an element (itself included) out of a parsed document, dropping
    /// every descendant whose tag is listed in `skip`.
    pub fn from_element(element: ElementRef<'_>, skip: &[&str]) -> Self {
        let mut tree = Tree::new(FragmentNode::Root);
        {
            let mut root = tree.root_mut();
            let mut copied = root.append(FragmentNode::Element(ElementData::from(element.value())));
            copy_children(*element, &mut copied, skip);
        }
        let mut frag = Self { tree };
        frag.merge_all_text();
        frag
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, FragmentNode>> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id).and_then(|n| n.value().as_element())
    }

    /// Runs `f` on the element at `id`. Returns false for non-elements.
    pub fn update_element<F>(&mut self, id: NodeId, f: F) -> bool
    where
        F: FnOnce(&mut ElementData),
    {
        match self.tree.get_mut(id) {
            Some(mut node) => match node.value().as_element_mut() {
                Some(el) => {
                    f(el);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Ids of all live elements in document order.
    pub fn element_ids(&self) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|n| n.value().as_element().is_some())
            .map(|n| n.id())
            .collect()
    }

    /// Ids of all live elements with the given tag, in document order.
    pub fn elements_named(&self, tag: &str) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|n| n.value().as_element().is_some_and(|el| el.is(tag)))
            .map(|n| n.id())
            .collect()
    }

    /// True while the node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root_id();
        match self.tree.get(id) {
            Some(node) => id == root || node.ancestors().any(|a| a.id() == root),
            None => false,
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.tree.get(id).map_or(0, |n| n.children().count())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            for d in node.descendants() {
                if let FragmentNode::Text(t) = d.value() {
                    out.push_str(t);
                }
            }
        }
        out
    }

    /// True when the node's text is empty, whitespace, or non-breaking spaces.
    pub fn has_blank_text(&self, id: NodeId) -> bool {
        is_blank_text(&self.text_content(id))
    }

    /// True if any strict descendant is an element with one of `tags`.
    pub fn has_descendant_tag(&self, id: NodeId, tags: &[&str]) -> bool {
        self.tree.get(id).is_some_and(|node| {
            node.descendants()
                .skip(1)
                .any(|d| d.value().as_element().is_some_and(|el| el.is_any(tags)))
        })
    }

    /// Replaces the node with its children, in place. Returns false when the
    /// node is detached or is the root.
    pub fn unwrap(&mut self, id: NodeId) -> bool {
        let (parent, children) = match self.tree.get(id) {
            Some(node) => match node.parent() {
                Some(p) => (p.id(), node.children().map(|c| c.id()).collect::<Vec<_>>()),
                None => return false,
            },
            None => return false,
        };

        if let Some(mut node) = self.tree.get_mut(id) {
            for child in children {
                node.insert_id_before(child);
            }
            node.detach();
        }
        self.merge_text_children(parent);
        true
    }

    /// Detaches the node and its subtree. Returns false for the root.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let parent = match self.tree.get(id).and_then(|n| n.parent()) {
            Some(p) => p.id(),
            None => return false,
        };
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
        self.merge_text_children(parent);
        true
    }

    fn merge_all_text(&mut self) {
        let ids: Vec<NodeId> = self.tree.root().descendants().map(|n| n.id()).collect();
        for id in ids {
            self.merge_text_children(id);
        }
    }

    /// Merges runs of adjacent text children and drops empty ones.
    fn merge_text_children(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = match self.tree.get(parent) {
            Some(p) => p.children().map(|c| c.id()).collect(),
            None => return,
        };

        let mut run_head: Option<NodeId> = None;
        for child in children {
            let text = match self.tree.get(child).map(|n| n.value()) {
                Some(FragmentNode::Text(t)) => Some(t.clone()),
                _ => None,
            };
            match (text, run_head) {
                (Some(t), _) if t.is_empty() => {
                    if let Some(mut n) = self.tree.get_mut(child) {
                        n.detach();
                    }
                }
                (Some(t), Some(head)) => {
                    if let Some(mut h) = self.tree.get_mut(head) {
                        if let FragmentNode::Text(existing) = h.value() {
                            existing.push_str(&t);
                        }
                    }
                    if let Some(mut n) = self.tree.get_mut(child) {
                        n.detach();
                    }
                }
                (Some(_), None) => run_head = Some(child),
                (None, _) => run_head = None,
            }
        }
    }

    /// Serializes the fragment's top-level nodes.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.tree.root().children() {
            serialize_node(child, &mut out);
        }
        out
    }
}

/// True when the text holds nothing but whitespace or non-breaking spaces.
pub fn is_blank_text(text: &str) -> bool {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}');
    trimmed.is_empty() || trimmed == "&nbsp;"
}

fn copy_children(
    src: ego_tree::NodeRef<'_, Node>,
    dst: &mut NodeMut<'_, FragmentNode>,
    skip: &[&str],
) {
    for child in src.children() {
        match child.value() {
            Node::Text(text) => {
                dst.append(FragmentNode::Text((&**text).to_owned()));
            }
            Node::Element(el) => {
                if skip.iter().any(|s| el.name().eq_ignore_ascii_case(s)) {
                    continue;
                }
                let mut copied = dst.append(FragmentNode::Element(ElementData::from(el)));
                copy_children(child, &mut copied, skip);
            }
            _ => {}
        }
    }
}

fn serialize_node(node: NodeRef<'_, FragmentNode>, out: &mut String) {
    match node.value() {
        FragmentNode::Root => {
            for child in node.children() {
                serialize_node(child, out);
            }
        }
        FragmentNode::Text(t) => out.push_str(&escape_text(t)),
        FragmentNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (k, v) in &el.attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attr(v));
                out.push('"');
            }

            if is_void_element(&el.name) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in node.children() {
                serialize_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_void_element(tag: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_serialize_keeps_structure() {
        let frag = Fragment::parse(r#"<div class="a"><p>One &amp; two</p><img src="x.png"></div>"#);
        assert_eq!(
            frag.to_html(),
            r#"<div class="a"><p>One &amp; two</p><img src="x.png" /></div>"#
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        let frag = Fragment::parse("<p>a<!-- note -->b</p>");
        assert_eq!(frag.to_html(), "<p>ab</p>");
    }

    #[test]
    fn test_unwrap_hoists_children_in_order() {
        let mut frag = Fragment::parse("<section><div><p>a</p><p>b</p></div></section>");
        let div = frag.elements_named("div")[0];
        assert!(frag.unwrap(div));
        assert_eq!(frag.to_html(), "<section><p>a</p><p>b</p></section>");
        assert!(!frag.is_attached(div));
    }

    #[test]
    fn test_unwrap_merges_adjacent_text() {
        let mut frag = Fragment::parse("<p>x<span>y</span>z</p>");
        let span = frag.elements_named("span")[0];
        frag.unwrap(span);
        let p = frag.elements_named("p")[0];
        assert_eq!(frag.child_count(p), 1);
        assert_eq!(frag.to_html(), "<p>xyz</p>");
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut frag = Fragment::parse("<p>keep</p><nav><a href=\"/\">x</a></nav>");
        let nav = frag.elements_named("nav")[0];
        let a = frag.elements_named("a")[0];
        assert!(frag.remove(nav));
        assert!(!frag.is_attached(a));
        assert_eq!(frag.to_html(), "<p>keep</p>");
    }

    #[test]
    fn test_root_cannot_be_removed_or_unwrapped() {
        let mut frag = Fragment::parse("<p>x</p>");
        let root = frag.root_id();
        assert!(!frag.remove(root));
        assert!(!frag.unwrap(root));
    }

    #[test]
    fn test_blank_text_detection() {
        assert!(is_blank_text(""));
        assert!(is_blank_text(" \n\t"));
        assert!(is_blank_text("\u{a0}\u{a0}"));
        assert!(is_blank_text("&nbsp;"));
        assert!(!is_blank_text(" a "));
    }

    #[test]
    fn test_from_element_skips_listed_tags() {
        let doc = Html::parse_document(
            r#"<html><body><article><script>x()</script><p>Body</p><footer>f</footer></article></body></html>"#,
        );
        let sel = scraper::Selector::parse("article").unwrap();
        let el = doc.select(&sel).next().unwrap();
        let frag = Fragment::from_element(el, &["script", "footer"]);
        assert_eq!(frag.to_html(), "<article><p>Body</p></article>");
    }
}
