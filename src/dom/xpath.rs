use crate::dom::snapshot::{DomSnapshot, NodeId, NodeKind, SnapshotNode};
use std::collections::HashMap;

/// Memo of synthesized XPaths for one extraction pass, keyed by snapshot
/// node id. Never reused across snapshots.
#[derive(Debug, Default)]
pub struct XPathCache {
    paths: HashMap<NodeId, String>,
}

impl XPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// XPath for a node, synthesizing it on first request
    pub fn get(&mut self, snapshot: &DomSnapshot, id: NodeId) -> &str {
        self.paths.entry(id).or_insert_with(|| xpath_for(snapshot, id))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Synthesize an XPath locator for a node.
///
/// An element carrying a non-empty `id` attribute short-circuits to
/// `//*[@id='…']` without walking the ancestor chain; duplicate ids in the
/// page are not detected, so the locator is only as unique as the id.
///
/// Otherwise the path is built by walking parents upward: each element
/// level emits its tag, with a 1-based positional predicate only when the
/// node has same-kind, same-name siblings. Text levels emit no segment.
pub fn xpath_for(snapshot: &DomSnapshot, id: NodeId) -> String {
    let node = snapshot.node(id);
    if let Some(value) = node.attribute("id") {
        if !value.is_empty() {
            return format!("//*[@id='{value}']");
        }
    }

    let mut parts: Vec<String> = Vec::new();
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = snapshot.node(node_id);
        let (position, has_same_kind_siblings) = sibling_position(snapshot, node_id);
        if let Some(tag) = node.tag() {
            if has_same_kind_siblings {
                parts.push(format!("{tag}[{position}]"));
            } else {
                parts.push(tag.to_string());
            }
        }
        current = snapshot.parent(node_id);
    }

    if parts.is_empty() {
        return String::new();
    }
    parts.reverse();
    format!("/{}", parts.join("/"))
}

/// 1-based position among same-kind, same-name siblings, and whether any
/// other such sibling exists. A node without a parent counts as alone.
fn sibling_position(snapshot: &DomSnapshot, id: NodeId) -> (usize, bool) {
    let Some(parent) = snapshot.parent(id) else {
        return (1, false);
    };

    let node = snapshot.node(id);
    let mut position = 0;
    let mut same_kind = 0;
    for &sibling in snapshot.children(parent) {
        if same_name(snapshot.node(sibling), node) {
            same_kind += 1;
            if sibling == id {
                position = same_kind;
            }
        }
    }
    (position, same_kind > 1)
}

fn same_name(a: &SnapshotNode, b: &SnapshotNode) -> bool {
    match (&a.kind, &b.kind) {
        (NodeKind::Element { tag: a, .. }, NodeKind::Element { tag: b, .. }) => a == b,
        (NodeKind::Text { .. }, NodeKind::Text { .. }) => true,
        _ => false,
    }
}
