use crate::dom::selector_map::SelectorMap;
use crate::dom::snapshot::{DomSnapshot, NodeId, NodeKind, SnapshotNode};
use crate::dom::xpath::XPathCache;
use serde::Serialize;

/// Attributes always reported, besides the `aria-*` and `data-*` families
const ESSENTIAL_ATTRIBUTES: &[&str] = &["id", "class", "href", "src"];

/// One extraction result: the indexed text block and its locator map.
/// Line `index:` prefixes and selector-map indices correspond 1:1, in the
/// same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub output_string: String,
    pub selector_map: SelectorMap,
}

/// Serialize candidates in traversal order into an indexed text block and
/// its selector map.
///
/// Text nodes render as `index:text`; elements as
/// `index:<tag attrs>text</tag>` with the essential attributes and the
/// subtree's text content. Emitted text is whitespace-collapsed so every
/// candidate occupies exactly one line.
pub fn serialize_candidates(snapshot: &DomSnapshot, candidates: &[NodeId]) -> Extraction {
    let mut cache = XPathCache::new();
    let mut output_string = String::new();
    let mut selector_map = SelectorMap::new();

    for (index, &id) in candidates.iter().enumerate() {
        let node = snapshot.node(id);
        match &node.kind {
            NodeKind::Text { content } => {
                output_string.push_str(&format!("{index}:{}\n", collapse_whitespace(content)));
            }
            NodeKind::Element { tag, .. } => {
                let attributes = essential_attributes(node);
                let text = collapse_whitespace(&snapshot.text_content(id));
                if attributes.is_empty() {
                    output_string.push_str(&format!("{index}:<{tag}>{text}</{tag}>\n"));
                } else {
                    output_string.push_str(&format!("{index}:<{tag} {attributes}>{text}</{tag}>\n"));
                }
            }
        }
        selector_map.insert(index, cache.get(snapshot, id));
    }

    Extraction { output_string, selector_map }
}

/// `id`, `class`, `href`, `src`, any `aria-*`, and all `data-*` attributes
/// in document order, rendered `name="value"` and space-joined
fn essential_attributes(node: &SnapshotNode) -> String {
    let Some(attributes) = node.attributes() else {
        return String::new();
    };

    let mut parts = Vec::new();
    for (name, value) in attributes {
        if ESSENTIAL_ATTRIBUTES.contains(&name.as_str()) || name.starts_with("aria-") || name.starts_with("data-") {
            parts.push(format!("{name}=\"{value}\""));
        }
    }
    parts.join(" ")
}

/// Collapse every whitespace run (including newlines) to a single space
/// and trim the ends, keeping each candidate on one output line
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
