use crate::dom::snapshot::{DomSnapshot, NodeId, SnapshotNode};
use std::collections::HashSet;

/// Tags that are interactive regardless of attributes
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "details", "embed", "input", "label", "menu", "menuitem", "object", "select", "textarea", "summary",
];

/// `role` attribute values that mark an element interactive
const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "menu",
    "menuitem",
    "link",
    "checkbox",
    "radio",
    "slider",
    "tab",
    "tabpanel",
    "textbox",
    "combobox",
    "grid",
    "listbox",
    "option",
    "progressbar",
    "scrollbar",
    "searchbox",
    "switch",
    "tree",
    "treeitem",
    "spinbutton",
    "tooltip",
];

/// `aria-role` attribute values that mark an element interactive
const INTERACTIVE_ARIA_ROLES: &[&str] = &["menu", "menuitem", "button"];

/// Tags that never count as leaves even when childless (embed-like content)
const LEAF_DENYLIST: &[&str] = &["svg", "iframe", "script", "style", "link"];

/// Select the nodes worth reporting, in document order.
///
/// Pre-order, left-to-right traversal from `body` using an explicit LIFO
/// worklist: seeded with body's children in reverse, and each popped
/// element pushes its own children in reverse. A node qualifies when it is
/// visible text, or an active+visible element that is interactive or a
/// leaf. A text node whose parent element was itself reported is skipped,
/// since the element line already carries its text.
pub fn collect_candidates(snapshot: &DomSnapshot) -> Vec<NodeId> {
    let Some(body) = snapshot.body() else {
        return Vec::new();
    };

    let mut worklist: Vec<NodeId> = snapshot.children(body).iter().rev().copied().collect();
    let mut candidates = Vec::new();
    let mut reported: HashSet<NodeId> = HashSet::new();

    while let Some(id) = worklist.pop() {
        let node = snapshot.node(id);

        if node.is_element() {
            for &child in snapshot.children(id).iter().rev() {
                worklist.push(child);
            }

            if (is_interactive(node) || is_leaf(snapshot, id))
                && is_active(node)
                && is_element_visible(snapshot, id)
            {
                reported.insert(id);
                candidates.push(id);
            }
        } else if is_text_candidate(snapshot, id) {
            // Parents precede children in the pre-order worklist, so the
            // parent's verdict is already known here
            let parent_reported = snapshot.parent(id).is_some_and(|parent| reported.contains(&parent));
            if !parent_reported {
                candidates.push(id);
            }
        }
    }

    candidates
}

/// Interactive: tag, `role`, or `aria-role` in the fixed allow-lists
pub fn is_interactive(node: &SnapshotNode) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };

    INTERACTIVE_TAGS.contains(&tag)
        || node.attribute("role").is_some_and(|role| INTERACTIVE_ROLES.contains(&role))
        || node.attribute("aria-role").is_some_and(|role| INTERACTIVE_ARIA_ROLES.contains(&role))
}

/// Leaf: childless with a tag outside the denylist, or wrapping exactly
/// one text node
pub fn is_leaf(snapshot: &DomSnapshot, id: NodeId) -> bool {
    let node = snapshot.node(id);
    let Some(tag) = node.tag() else {
        return false;
    };

    let children = snapshot.children(id);
    match children {
        [] => !LEAF_DENYLIST.contains(&tag),
        [only] => snapshot.node(*only).is_text(),
        _ => false,
    }
}

/// Active: not `disabled`, not `hidden`, not `aria-disabled="true"`
pub fn is_active(node: &SnapshotNode) -> bool {
    !(node.has_attribute("disabled")
        || node.has_attribute("hidden")
        || node.attribute("aria-disabled") == Some("true"))
}

/// Element visibility: nonzero-area rect whose top edge sits within the
/// viewport, topmost at one of the hit-test sample points, and visible per
/// computed style
pub fn is_element_visible(snapshot: &DomSnapshot, id: NodeId) -> bool {
    let node = snapshot.node(id);
    in_viewport_band(node, snapshot.metrics().viewport_height) && node.hit_visible && node.style_visible
}

/// Text candidacy: non-empty trimmed content plus the same geometry test
/// on the text's range rect, with the parent's hit-test and style verdicts
fn is_text_candidate(snapshot: &DomSnapshot, id: NodeId) -> bool {
    let node = snapshot.node(id);
    let Some(content) = node.text() else {
        return false;
    };

    !content.trim().is_empty()
        && in_viewport_band(node, snapshot.metrics().viewport_height)
        && node.hit_visible
        && node.style_visible
}

fn in_viewport_band(node: &SnapshotNode, viewport_height: f64) -> bool {
    node.rect.has_area() && node.rect.top() >= 0.0 && node.rect.top() <= viewport_height
}
