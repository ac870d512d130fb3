//! In-page debug overlay
//!
//! Outlines the elements a selector map points at, directly in the live
//! page, so a human can see what an extraction picked. The overlay stashes
//! each element's previous outline in a marker attribute and restores it
//! on cleanup.

use crate::dom::SelectorMap;
use crate::error::{Result, ScoutError};
use headless_chrome::Tab;
use std::sync::Arc;

const MARKER_ATTRIBUTE: &str = "data-page-scout-outline";

const HIGHLIGHT_JS: &str = r#"
(() => {
    const xpaths = __XPATHS__;
    let outlined = 0;
    for (const xpath of xpaths) {
        let node = null;
        try {
            node = document.evaluate(xpath, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
        } catch (e) {
            continue;
        }
        const element = node && node.nodeType === Node.TEXT_NODE ? node.parentElement : node;
        if (!element || !element.style || element.hasAttribute('__MARKER__')) continue;
        element.setAttribute('__MARKER__', element.style.outline);
        element.style.outline = '2px dashed rgba(230, 0, 126, 0.9)';
        outlined += 1;
    }
    return outlined;
})()
"#;

const CLEANUP_JS: &str = r#"
(() => {
    const marked = document.querySelectorAll('[__MARKER__]');
    for (const element of marked) {
        element.style.outline = element.getAttribute('__MARKER__');
        element.removeAttribute('__MARKER__');
    }
    return marked.length;
})()
"#;

/// Outline every element the selector map resolves to. Unresolvable
/// XPaths are skipped. Returns the number of elements outlined.
pub fn start_dom_debug(tab: &Arc<Tab>, selector_map: &SelectorMap) -> Result<usize> {
    let xpaths: Vec<&str> = selector_map.iter().map(|(_, xpath)| xpath).collect();
    let encoded = serde_json::to_string(&xpaths)
        .map_err(|e| ScoutError::ScriptFailed(format!("encode debug xpaths: {e}")))?;

    let js = HIGHLIGHT_JS.replace("__XPATHS__", &encoded).replace("__MARKER__", MARKER_ATTRIBUTE);
    let result = tab.evaluate(&js, false).map_err(|e| ScoutError::ScriptFailed(format!("debug overlay: {e}")))?;

    let outlined = result.value.and_then(|value| value.as_u64()).unwrap_or(0) as usize;
    log::debug!("debug overlay outlined {outlined} elements");
    Ok(outlined)
}

/// Remove every outline the overlay applied. Returns how many elements
/// were restored.
pub fn cleanup_dom_debug(tab: &Arc<Tab>) -> Result<usize> {
    let js = CLEANUP_JS.replace("__MARKER__", MARKER_ATTRIBUTE);
    let result = tab.evaluate(&js, false).map_err(|e| ScoutError::ScriptFailed(format!("debug cleanup: {e}")))?;

    Ok(result.value.and_then(|value| value.as_u64()).unwrap_or(0) as usize)
}
