//! # page-scout
//!
//! A Rust library for structured page observation via Chrome DevTools Protocol (CDP),
//! designed for AI agent integration.
//!
//! ## Features
//!
//! - **Browser Session Management**: Launch or connect to Chrome/Chromium instances
//! - **Indexed DOM Extraction**: Walk the rendered page in viewport-sized chunks and
//!   produce a compact indexed text block plus an index→XPath selector map
//! - **Flat Element View**: A looser whole-page listing of visible elements with
//!   geometry and interactivity flags
//! - **Settle Waits**: Scroll-and-settle and mutation-quiescence waits for dynamic pages
//! - **Annotated Screenshots**: Numbered boxes over screenshots for vision-capable consumers
//!
//! ## Extracting a Page
//!
//! ```rust,no_run
//! use page_scout::{BrowserSession, LaunchOptions};
//!
//! # fn main() -> page_scout::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//!
//! session.navigate("https://example.com")?;
//! session.wait_for_navigation()?;
//! session.wait_for_dom_settle()?;
//!
//! // Extract the chunk nearest the current scroll position
//! let dom = session.process_dom(&[])?;
//! println!("{}", dom.output_string);
//!
//! // Each output line's index maps to an XPath locator
//! if let Some(xpath) = dom.selector_map.get(0) {
//!     println!("element 0 lives at {xpath}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Callers page through a long document by accumulating seen chunks:
//!
//! ```rust,no_run
//! # use page_scout::{BrowserSession, LaunchOptions};
//! # fn main() -> page_scout::Result<()> {
//! # let session = BrowserSession::launch(LaunchOptions::default())?;
//! let mut seen = Vec::new();
//! loop {
//!     let dom = session.process_dom(&seen)?;
//!     seen.push(dom.chunk);
//!     if seen.len() == dom.chunks.len() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management, settle waits, debug overlay
//! - [`dom`]: Snapshot capture, candidate selection, XPath synthesis, serialization
//! - [`annotate`]: Screenshot annotation
//! - [`error`]: Error types and result alias

pub mod annotate;
pub mod browser;
pub mod dom;
pub mod error;

pub use annotate::{Annotation, Annotator};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use dom::{BoundingBox, DomSnapshot, Extraction, PageMetrics, ProcessedDom, SelectorMap, VisibleElement};
pub use error::{Result, ScoutError};
