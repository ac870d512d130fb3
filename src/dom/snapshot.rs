use crate::error::{Result, ScoutError};
use headless_chrome::Tab;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// JavaScript evaluated in the tab to capture the page snapshot.
/// Returns a JSON string (see `RawSnapshot` for the shape).
const SNAPSHOT_JS: &str = include_str!("snapshot.js");

const PAGE_METRICS_JS: &str = r#"JSON.stringify({
    viewportWidth: window.innerWidth,
    viewportHeight: window.innerHeight,
    scrollX: window.scrollX,
    scrollY: window.scrollY,
    documentHeight: document.documentElement.scrollHeight
})"#;

/// Identifies a node within one `DomSnapshot`
pub type NodeId = usize;

/// Layout metrics of the page at capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Full scrollable height of the document
    pub document_height: f64,
}

/// Viewport-relative bounding box of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge, relative to the viewport at capture time
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Whether the box covers any pixels at all
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Area of the bounding box
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// What a snapshot node is: a markup element or a run of character data
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        /// Lowercased tag name
        tag: String,
        /// Attributes in document order
        attributes: IndexMap<String, String>,
    },
    Text {
        /// Raw character data (untrimmed)
        content: String,
    },
}

/// A single node in a captured snapshot.
///
/// For text nodes, `style_visible` and `hit_visible` are the parent
/// element's verdicts measured at the text's range rect.
#[derive(Debug, Clone)]
pub struct SnapshotNode {
    pub kind: NodeKind,
    pub rect: BoundingBox,
    pub style_visible: bool,
    pub hit_visible: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SnapshotNode {
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Tag name for element nodes
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Attribute value by name, for element nodes
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attributes in document order, for element nodes
    pub fn attributes(&self) -> Option<&IndexMap<String, String>> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text { .. } => None,
        }
    }

    /// Raw character data, for text nodes
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content } => Some(content),
            NodeKind::Element { .. } => None,
        }
    }
}

/// Raw serde shape of the capture script output
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    metrics: PageMetrics,
    root: RawNode,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawNode {
    #[serde(rename_all = "camelCase")]
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<(String, String)>,
        rect: BoundingBox,
        style_visible: bool,
        hit_visible: bool,
        #[serde(default)]
        children: Vec<RawNode>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        rect: BoundingBox,
        style_visible: bool,
        hit_visible: bool,
    },
}

/// An immutable snapshot of the rendered page: page metrics plus a flat
/// arena of nodes in pre-order (document order), linked by ids.
///
/// All rects are viewport-relative at the scroll position the capture ran
/// at; nothing in a snapshot tracks the live page afterwards.
#[derive(Debug, Clone)]
pub struct DomSnapshot {
    metrics: PageMetrics,
    nodes: Vec<SnapshotNode>,
    root: NodeId,
}

impl DomSnapshot {
    /// Capture a snapshot from a browser tab
    pub fn capture(tab: &Arc<Tab>) -> Result<Self> {
        let started = Instant::now();

        let result = tab
            .evaluate(SNAPSHOT_JS, false)
            .map_err(|e| ScoutError::ScriptFailed(format!("snapshot capture: {e}")))?;

        let value = result
            .value
            .ok_or_else(|| ScoutError::ScriptFailed("snapshot capture returned no value".to_string()))?;

        // The script returns a JSON string, so parse the string first
        let json: String = serde_json::from_value(value)
            .map_err(|e| ScoutError::SnapshotParse(format!("expected a JSON string: {e}")))?;

        let snapshot = Self::from_json(&json)?;
        log::debug!("captured snapshot of {} nodes in {:?}", snapshot.len(), started.elapsed());

        Ok(snapshot)
    }

    /// Parse a snapshot from the capture script's JSON output
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json).map_err(|e| ScoutError::SnapshotParse(e.to_string()))?;

        let mut nodes = Vec::new();
        let root = flatten(raw.root, None, &mut nodes);

        Ok(Self { metrics: raw.metrics, nodes, root })
    }

    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SnapshotNode {
        &self.nodes[id]
    }

    /// Total node count (elements and text nodes)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// First `body` element in document order, if the page has one.
    /// The arena is in pre-order, so a linear scan finds it.
    pub fn body(&self) -> Option<NodeId> {
        (0..self.nodes.len()).find(|&id| self.nodes[id].tag() == Some("body"))
    }

    /// Concatenated descendant character data in document order
    /// (the `textContent` of the node)
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text { content } => out.push_str(content),
            NodeKind::Element { .. } => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Ids of every element node, in document order
    pub fn element_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.nodes[id].is_element())
    }
}

fn flatten(raw: RawNode, parent: Option<NodeId>, nodes: &mut Vec<SnapshotNode>) -> NodeId {
    let id = nodes.len();
    match raw {
        RawNode::Element { tag, attributes, rect, style_visible, hit_visible, children } => {
            nodes.push(SnapshotNode {
                kind: NodeKind::Element { tag, attributes: attributes.into_iter().collect() },
                rect,
                style_visible,
                hit_visible,
                parent,
                children: Vec::new(),
            });
            let child_ids: Vec<NodeId> = children.into_iter().map(|child| flatten(child, Some(id), nodes)).collect();
            nodes[id].children = child_ids;
        }
        RawNode::Text { content, rect, style_visible, hit_visible } => {
            nodes.push(SnapshotNode {
                kind: NodeKind::Text { content },
                rect,
                style_visible,
                hit_visible,
                parent,
                children: Vec::new(),
            });
        }
    }
    id
}

/// Read the page's layout metrics without capturing a full snapshot
pub fn page_metrics(tab: &Arc<Tab>) -> Result<PageMetrics> {
    let result = tab
        .evaluate(PAGE_METRICS_JS, false)
        .map_err(|e| ScoutError::ScriptFailed(format!("page metrics: {e}")))?;

    let value = result
        .value
        .ok_or_else(|| ScoutError::ScriptFailed("page metrics returned no value".to_string()))?;

    let json: String =
        serde_json::from_value(value).map_err(|e| ScoutError::SnapshotParse(format!("expected a JSON string: {e}")))?;

    serde_json::from_str(&json).map_err(|e| ScoutError::SnapshotParse(e.to_string()))
}
