use crate::dom::snapshot::{BoundingBox, DomSnapshot, NodeId, SnapshotNode};
use crate::dom::xpath::XPathCache;
use indexmap::IndexMap;
use serde::Serialize;

/// Tags the flat extractor treats as clickable
const CLICKABLE_TAGS: &[&str] = &["a", "button", "details", "input", "option", "select", "summary", "textarea"];

/// `role` values the flat extractor treats as clickable
const CLICKABLE_ROLES: &[&str] = &["button", "link", "checkbox", "menuitem", "tab"];

/// Flat descriptor of one visible element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleElement {
    pub xpath: String,
    pub text: String,
    pub tag_name: String,
    pub is_interactive: bool,
    pub attributes: IndexMap<String, String>,
    pub bounding_box: BoundingBox,
}

/// Describe every visible element under `body`, in document order.
///
/// The looser, flat view of the page: visibility is computed style plus
/// nonzero geometry only (no hit-testing, no viewport bound), and
/// interactivity uses the clickable tag/role rules plus `onclick`
/// handlers. No indexing, no chunking; consumers filter the descriptor
/// list themselves.
pub fn collect_visible_elements(snapshot: &DomSnapshot) -> Vec<VisibleElement> {
    let Some(body) = snapshot.body() else {
        return Vec::new();
    };

    let mut cache = XPathCache::new();
    let mut out = Vec::new();
    let mut worklist: Vec<NodeId> = snapshot.children(body).iter().rev().copied().collect();

    while let Some(id) = worklist.pop() {
        let node = snapshot.node(id);
        if !node.is_element() {
            continue;
        }
        for &child in snapshot.children(id).iter().rev() {
            worklist.push(child);
        }

        if node.style_visible && node.rect.has_area() {
            out.push(describe(snapshot, id, &mut cache));
        }
    }

    out
}

fn describe(snapshot: &DomSnapshot, id: NodeId, cache: &mut XPathCache) -> VisibleElement {
    let node = snapshot.node(id);
    VisibleElement {
        xpath: cache.get(snapshot, id).to_string(),
        text: snapshot.text_content(id).trim().to_string(),
        tag_name: node.tag().unwrap_or_default().to_string(),
        is_interactive: is_clickable(node),
        attributes: node.attributes().cloned().unwrap_or_default(),
        bounding_box: node.rect,
    }
}

fn is_clickable(node: &SnapshotNode) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };

    CLICKABLE_TAGS.contains(&tag)
        || node.has_attribute("onclick")
        || node.attribute("role").is_some_and(|role| CLICKABLE_ROLES.contains(&role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::snapshot::BoundingBox;
    use crate::dom::testutil::{element, element_with, page, text};

    #[test]
    fn test_describes_every_visible_element() {
        let snapshot = page(vec![
        element("div", &[], vec![
            element("a", &[("href", "/x")], vec![text("X")]),
            element("p", &[], vec![text("prose")]),
        ])]);

        let elements = collect_visible_elements(&snapshot);
        let tags: Vec<&str> = elements.iter().map(|el| el.tag_name.as_str()).collect();

        // The non-interactive, non-leaf container is included too
        assert_eq!(tags, vec!["div", "a", "p"]);
        assert_eq!(elements[0].text, "Xprose");
    }

    #[test]
    fn test_style_visibility_only() {
        let band = BoundingBox::new(10.0, 10.0, 50.0, 20.0);
        let snapshot = page(vec![
            // Occluded: the flat extractor ignores hit-testing
            element_with("button", &[("id", "covered")], band, true, false, vec![]),
            // Below the viewport: no viewport bound either
            element_with("button", &[("id", "below")], BoundingBox::new(10.0, 3000.0, 50.0, 20.0), true, false, vec![]),
            // display:none equivalent stays excluded
            element_with("button", &[("id", "styled-out")], band, false, true, vec![]),
            // Zero-area stays excluded
            element_with("button", &[("id", "flat")], BoundingBox::new(10.0, 10.0, 0.0, 0.0), true, true, vec![]),
        ]);

        let elements = collect_visible_elements(&snapshot);
        let ids: Vec<Option<&str>> = elements.iter().map(|el| el.attributes.get("id").map(String::as_str)).collect();
        assert_eq!(ids, vec![Some("covered"), Some("below")]);
    }

    #[test]
    fn test_interactivity_rules() {
        let snapshot = page(vec![
            element("a", &[("href", "/x")], vec![]),
            element("div", &[("onclick", "go()")], vec![]),
            element("div", &[("role", "link")], vec![]),
            element("p", &[], vec![]),
        ]);

        let elements = collect_visible_elements(&snapshot);
        let flags: Vec<bool> = elements.iter().map(|el| el.is_interactive).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn test_descriptor_carries_all_attributes_and_xpath() {
        let snapshot = page(vec![element(
            "input",
            &[("type", "text"), ("style", "width: 10em"), ("name", "q")],
            vec![],
        )]);

        let elements = collect_visible_elements(&snapshot);
        assert_eq!(elements.len(), 1);

        let input = &elements[0];
        assert_eq!(input.xpath, "/html/body/input");
        // Unlike the indexed serialization, nothing is filtered here
        assert_eq!(input.attributes.len(), 3);
        assert_eq!(input.attributes.get("style").map(String::as_str), Some("width: 10em"));
        assert_eq!(input.bounding_box, BoundingBox::new(10.0, 10.0, 100.0, 20.0));
    }
}
