//! Page quiescence waits: scroll settle and DOM settle
//!
//! Both waits are async expressions evaluated in the page and awaited
//! through CDP. Neither supports cancellation; the only bounds on latency
//! are the debounce windows themselves.

use crate::error::{Result, ScoutError};
use headless_chrome::Tab;
use std::sync::Arc;
use std::time::Instant;

/// Quiet window after the last `scroll` event before a scroll resolves
pub const SCROLL_DEBOUNCE_MS: u64 = 200;

/// Quiet window with no subtree mutation before the DOM counts as settled
pub const DOM_SETTLE_QUIET_MS: u64 = 2000;

const SCROLL_TO_HEIGHT_JS: &str = r#"
(async () => {
    const maxScroll = Math.max(0, document.documentElement.scrollHeight - window.innerHeight);
    const target = Math.max(0, Math.min(__HEIGHT__, maxScroll));
    window.scrollTo({ top: target, left: 0, behavior: 'smooth' });
    await new Promise((resolve) => {
        let timer = null;
        function finish() {
            window.removeEventListener('scroll', onScroll);
            resolve();
        }
        function onScroll() {
            if (timer) clearTimeout(timer);
            timer = setTimeout(finish, __DEBOUNCE_MS__);
        }
        window.addEventListener('scroll', onScroll);
        onScroll();
    });
})()
"#;

const WAIT_FOR_SETTLE_JS: &str = r#"
(async () => {
    await new Promise((resolve) => {
        function finish() {
            observer.disconnect();
            resolve();
        }
        let timer = setTimeout(finish, __QUIET_MS__);
        const observer = new MutationObserver(() => {
            clearTimeout(timer);
            timer = setTimeout(finish, __QUIET_MS__);
        });
        observer.observe(document.body, { childList: true, subtree: true, attributes: true });
    });
})()
"#;

/// Smooth-scroll to a vertical offset, clamped to the maximum scrollable
/// offset, and resolve once `scroll` events have been quiet for
/// [`SCROLL_DEBOUNCE_MS`]. A scroll that fires no events at all resolves
/// after the initial debounce window.
pub fn scroll_to_height(tab: &Arc<Tab>, height: f64) -> Result<()> {
    let js = SCROLL_TO_HEIGHT_JS
        .replace("__HEIGHT__", &height.to_string())
        .replace("__DEBOUNCE_MS__", &SCROLL_DEBOUNCE_MS.to_string());

    tab.evaluate(&js, true)
        .map_err(|e| ScoutError::ScriptFailed(format!("scroll to height {height}: {e}")))?;

    Ok(())
}

/// Resolve once no subtree mutation has been observed on `document.body`
/// for [`DOM_SETTLE_QUIET_MS`]. There is no upper bound: a page that keeps
/// mutating keeps the wait alive.
pub fn wait_for_dom_settle(tab: &Arc<Tab>) -> Result<()> {
    let started = Instant::now();
    let js = WAIT_FOR_SETTLE_JS.replace("__QUIET_MS__", &DOM_SETTLE_QUIET_MS.to_string());

    tab.evaluate(&js, true)
        .map_err(|e| ScoutError::ScriptFailed(format!("wait for DOM settle: {e}")))?;

    log::debug!("DOM settled after {:?}", started.elapsed());
    Ok(())
}
