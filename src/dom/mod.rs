//! Indexed DOM extraction
//!
//! This module turns a live page into the compact, indexed representation
//! an agent can reason over:
//! - `DomSnapshot`: an immutable capture of the rendered tree with the
//!   geometry/visibility facts only the engine can answer
//! - candidate selection, XPath synthesis, and serialization over a
//!   snapshot (pure, browser-free)
//! - the chunked entry points: `process_dom`, `process_elements`,
//!   `process_all_of_dom`, plus the flat `get_visible_elements` view

pub mod candidates;
pub mod chunk;
pub mod selector_map;
pub mod serialize;
pub mod snapshot;
pub mod visible;
pub mod xpath;

pub use selector_map::SelectorMap;
pub use serialize::Extraction;
pub use snapshot::{BoundingBox, DomSnapshot, NodeId, NodeKind, PageMetrics, SnapshotNode, page_metrics};
pub use visible::VisibleElement;

use crate::browser::settle;
use crate::error::Result;
use headless_chrome::Tab;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Result of a [`process_dom`] call: one chunk's extraction plus the
/// bookkeeping the caller needs to keep paging through the document
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDom {
    pub output_string: String,
    pub selector_map: SelectorMap,
    /// Chunk extracted by this call
    pub chunk: usize,
    /// Every chunk index of the page, top to bottom
    pub chunks: Vec<usize>,
}

/// Extract the unseen chunk nearest the current scroll position, scrolling
/// to it (and letting the scroll settle) first
pub fn process_dom(tab: &Arc<Tab>, chunks_seen: &[usize]) -> Result<ProcessedDom> {
    let metrics = snapshot::page_metrics(tab)?;
    let (chunk, chunks) = chunk::pick_chunk(chunks_seen, &metrics)?;
    log::debug!("picked chunk {chunk} of {} (seen: {chunks_seen:?})", chunks.len());

    let extraction = process_elements(tab, chunk, true)?;

    Ok(ProcessedDom {
        output_string: extraction.output_string,
        selector_map: extraction.selector_map,
        chunk,
        chunks,
    })
}

/// Extraction primitive for one chunk. Scrolls to the chunk's offset first
/// when `scroll_to_chunk` is set; either way, candidates are judged
/// against the viewport as it is at capture time.
pub fn process_elements(tab: &Arc<Tab>, chunk: usize, scroll_to_chunk: bool) -> Result<Extraction> {
    let started = Instant::now();

    if scroll_to_chunk {
        let metrics = snapshot::page_metrics(tab)?;
        settle::scroll_to_height(tab, chunk::chunk_offset(chunk, &metrics))?;
    }

    let snapshot = DomSnapshot::capture(tab)?;
    let extraction = extract(&snapshot);
    log::debug!(
        "processed chunk {chunk}: {} candidates in {:?}",
        extraction.selector_map.len(),
        started.elapsed()
    );

    Ok(extraction)
}

/// Pure extraction over a snapshot: candidate selection plus serialization
pub fn extract(snapshot: &DomSnapshot) -> Extraction {
    let candidates = candidates::collect_candidates(snapshot);
    serialize::serialize_candidates(snapshot, &candidates)
}

/// Extract every chunk of the page without scrolling and merge the
/// results: output strings concatenate, selector maps merge with later
/// chunks overwriting colliding indices.
///
/// Each chunk's indices restart from 0, so collisions are the norm and the
/// merged map keeps only the last writer. Known lossy behavior, kept as
/// is; actual collisions are logged at warn level.
pub fn process_all_of_dom(tab: &Arc<Tab>) -> Result<Extraction> {
    let started = Instant::now();
    let metrics = snapshot::page_metrics(tab)?;
    let chunks = chunk::chunk_list(&metrics);

    let mut output_string = String::new();
    let mut selector_map = SelectorMap::new();
    for &chunk_index in &chunks {
        let extraction = process_elements(tab, chunk_index, false)?;
        output_string.push_str(&extraction.output_string);
        let collisions = selector_map.merge(extraction.selector_map);
        if collisions > 0 {
            log::warn!("chunk {chunk_index} overwrote {collisions} selector indices from earlier chunks");
        }
    }
    log::debug!("processed {} chunks in {:?}", chunks.len(), started.elapsed());

    Ok(Extraction { output_string, selector_map })
}

/// Flat visible-element descriptors for the current page
pub fn get_visible_elements(tab: &Arc<Tab>) -> Result<Vec<VisibleElement>> {
    let snapshot = DomSnapshot::capture(tab)?;
    Ok(visible::collect_visible_elements(&snapshot))
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::snapshot::{BoundingBox, DomSnapshot};
    use serde_json::{Value, json};

    pub(crate) const VIEWPORT_HEIGHT: f64 = 720.0;

    fn rect_value(rect: BoundingBox) -> Value {
        json!({"x": rect.x, "y": rect.y, "width": rect.width, "height": rect.height})
    }

    pub(crate) fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<Value>) -> Value {
        element_with(tag, attrs, BoundingBox::new(10.0, 10.0, 100.0, 20.0), true, true, children)
    }

    pub(crate) fn element_with(
        tag: &str,
        attrs: &[(&str, &str)],
        rect: BoundingBox,
        style_visible: bool,
        hit_visible: bool,
        children: Vec<Value>,
    ) -> Value {
        let attributes: Vec<Value> = attrs.iter().map(|(name, value)| json!([name, value])).collect();
        json!({
            "kind": "element",
            "tag": tag,
            "attributes": attributes,
            "rect": rect_value(rect),
            "styleVisible": style_visible,
            "hitVisible": hit_visible,
            "children": children,
        })
    }

    pub(crate) fn text(content: &str) -> Value {
        text_with(content, BoundingBox::new(12.0, 12.0, 40.0, 16.0), true, true)
    }

    pub(crate) fn text_with(content: &str, rect: BoundingBox, style_visible: bool, hit_visible: bool) -> Value {
        json!({
            "kind": "text",
            "content": content,
            "rect": rect_value(rect),
            "styleVisible": style_visible,
            "hitVisible": hit_visible,
            "children": [],
        })
    }

    /// Wrap nodes in an html/body document with a 1280x720 viewport
    pub(crate) fn page(children: Vec<Value>) -> DomSnapshot {
        let frame = BoundingBox::new(0.0, 0.0, 1280.0, VIEWPORT_HEIGHT);
        let document = json!({
            "metrics": {
                "viewportWidth": 1280.0,
                "viewportHeight": VIEWPORT_HEIGHT,
                "scrollX": 0.0,
                "scrollY": 0.0,
                "documentHeight": VIEWPORT_HEIGHT,
            },
            "root": element_with("html", &[], frame, true, false, vec![
                element_with("body", &[], frame, true, false, children),
            ]),
        });
        DomSnapshot::from_json(&document.to_string()).expect("test snapshot should parse")
    }
}
