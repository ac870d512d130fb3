//! Browser session management and page-level waits
//!
//! - [`BrowserSession`]: launch or connect to a Chrome/Chromium instance
//!   and drive extraction against its tabs
//! - [`config`]: launch and connection options
//! - [`settle`]: scroll-and-settle and DOM-settle waits
//! - [`debug`]: in-page overlay for inspecting extraction results

pub mod config;
pub mod debug;
pub mod session;
pub mod settle;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
pub use settle::{scroll_to_height, wait_for_dom_settle};
