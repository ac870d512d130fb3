//! Error types for page-scout operations

use thiserror::Error;

/// Errors that can occur during browser control or page extraction
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Browser failed to launch
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Connection to an existing browser failed
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation to a URL failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A tab-level operation failed (create, close, activate)
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// A script evaluated in the page failed or returned nothing usable
    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    /// The page snapshot could not be parsed
    #[error("Failed to parse page snapshot: {0}")]
    SnapshotParse(String),

    /// Every chunk of the page has already been seen
    #[error("No chunks remaining to process (remaining: {remaining:?})")]
    NoChunksRemaining {
        /// Unseen chunk indices at the time of failure (empty by definition)
        remaining: Vec<usize>,
    },

    /// Screenshot capture failed
    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    /// Screenshot annotation failed
    #[error("Screenshot annotation failed: {0}")]
    Annotation(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScoutError::NoChunksRemaining { remaining: vec![] };
        assert!(err.to_string().contains("No chunks remaining"));

        let err = ScoutError::ScriptFailed("boom".to_string());
        assert_eq!(err.to_string(), "Script evaluation failed: boom");
    }
}
