use crate::annotate::{Annotator, annotations_for};
use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::browser::{debug, settle};
use crate::dom::{self, Extraction, PageMetrics, ProcessedDom, SelectorMap, VisibleElement};
use crate::error::{Result, ScoutError};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance and exposes
/// the extraction operations against its active tab
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive through long extraction sessions (the
        // default idle timeout is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| ScoutError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| ScoutError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| ScoutError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Create a new tab
    pub fn new_tab(&mut self) -> Result<Arc<Tab>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| ScoutError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;
        Ok(tab)
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ScoutError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // First pass: check for both visibility and focus (strongest signal)
        for tab in &tabs {
            let result = tab.evaluate("document.visibilityState === 'visible' && document.hasFocus()", false);
            match result {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(e) => {
                    log::debug!("Failed to check tab status: {}", e);
                    continue;
                }
            }
        }

        // Second pass: check just for visibility (weaker signal, but better than nothing)
        for tab in &tabs {
            let result = tab.evaluate("document.visibilityState === 'visible'", false);
            match result {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(_) => continue,
            }
        }

        Err(ScoutError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Close the active tab
    pub fn close_active_tab(&mut self) -> Result<()> {
        self.tab()?
            .close(true)
            .map_err(|e| ScoutError::TabOperationFailed(format!("Failed to close tab: {}", e)))?;

        Ok(())
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the active tab to a URL
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| ScoutError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| ScoutError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Extract the unseen chunk nearest the current scroll position,
    /// scrolling to it first. See [`dom::process_dom`].
    pub fn process_dom(&self, chunks_seen: &[usize]) -> Result<ProcessedDom> {
        dom::process_dom(&self.tab()?, chunks_seen)
    }

    /// Extract every chunk without scrolling and merge the results.
    /// See [`dom::process_all_of_dom`] for the merge semantics.
    pub fn process_all_of_dom(&self) -> Result<Extraction> {
        dom::process_all_of_dom(&self.tab()?)
    }

    /// Extraction primitive for a single chunk
    pub fn process_elements(&self, chunk: usize, scroll_to_chunk: bool) -> Result<Extraction> {
        dom::process_elements(&self.tab()?, chunk, scroll_to_chunk)
    }

    /// Smooth-scroll the active tab to a vertical offset and wait for the
    /// scroll to settle
    pub fn scroll_to_height(&self, height: f64) -> Result<()> {
        settle::scroll_to_height(&self.tab()?, height)
    }

    /// Wait until the active tab's DOM has been mutation-quiet for the
    /// settle window
    pub fn wait_for_dom_settle(&self) -> Result<()> {
        settle::wait_for_dom_settle(&self.tab()?)
    }

    /// Flat visible-element descriptors for the current page
    pub fn get_visible_elements(&self) -> Result<Vec<VisibleElement>> {
        dom::get_visible_elements(&self.tab()?)
    }

    /// Current layout metrics of the active tab
    pub fn page_metrics(&self) -> Result<PageMetrics> {
        dom::page_metrics(&self.tab()?)
    }

    /// Outline the elements of a selector map in the live page
    pub fn start_dom_debug(&self, selector_map: &SelectorMap) -> Result<usize> {
        debug::start_dom_debug(&self.tab()?, selector_map)
    }

    /// Remove the debug overlay
    pub fn cleanup_dom_debug(&self) -> Result<usize> {
        debug::cleanup_dom_debug(&self.tab()?)
    }

    /// Capture a PNG screenshot of the active tab's viewport
    pub fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.tab()?
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| ScoutError::Screenshot(e.to_string()))
    }

    /// Capture a screenshot with the current interactive elements boxed
    /// and numbered
    pub fn capture_annotated_screenshot(&self, annotator: &Annotator) -> Result<Vec<u8>> {
        let elements = self.get_visible_elements()?;
        let annotations = annotations_for(&elements);
        let png = self.capture_screenshot()?;
        annotator.annotate_png(&png, &annotations)
    }

    /// Close the browser by closing all tabs; the underlying process shuts
    /// down when the Browser instance is dropped
    pub fn close(&self) -> Result<()> {
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false); // Ignore errors on individual tab closes
        }
        Ok(())
    }
}
