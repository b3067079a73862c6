//! Result and error types for Shopcheck.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Shopcheck operations
pub type ShopcheckResult<T> = Result<T, ShopcheckError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ShopcheckError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page-level protocol error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// In-page script failed or returned an unexpected shape
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// A bounded wait elapsed
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Locator resolved to nothing when an element was required
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Selector description
        selector: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Price text had no numeric content
    #[error("Cannot parse a price from {text:?}")]
    PriceParse {
        /// The rendered text
        text: String,
    },

    /// URL pattern could not be compiled
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// Pattern source
        pattern: String,
        /// Error message
        message: String,
    },

    /// Cross-run state was never written by the setup phase
    #[error("Shared state file {} is missing; run `shopcheck setup` first", path.display())]
    MissingSharedState {
        /// Expected location
        path: PathBuf,
    },

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {message}")]
    Config {
        /// Setting name
        key: String,
        /// Error message
        message: String,
    },

    /// Direct HTTP request failed
    #[error("Request failed: {message}")]
    Request {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopcheckError {
    /// Build an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Build a script failure
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Whether this error only means a bounded wait elapsed
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
