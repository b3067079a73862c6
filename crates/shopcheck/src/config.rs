//! Suite configuration
//!
//! Every setting has a default suitable for the public storefront and can be
//! overridden through `SHOPCHECK_*` environment variables.

use crate::result::{ShopcheckError, ShopcheckResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default storefront under test
pub const DEFAULT_BASE_URL: &str = "https://automationexercise.com";

/// Default name of the cross-run state file
pub const DEFAULT_STATE_FILE: &str = "shared-state.json";

/// Default location of the state file: the workspace root, whichever
/// directory a test binary happens to run from.
#[must_use]
pub fn default_state_file() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .unwrap_or(manifest_dir)
        .join(DEFAULT_STATE_FILE)
}

/// Browser window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Configuration shared by the fixture, the page areas and the CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Storefront root; relative navigation resolves against it
    pub base_url: String,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Auto-wait bound for locator actions (ms)
    pub action_timeout_ms: u64,
    /// Auto-retry bound for expectations (ms)
    pub expect_timeout_ms: u64,
    /// Bound for page loads (ms)
    pub navigation_timeout_ms: u64,
    /// Bound for the optional consent dialog (ms)
    pub consent_timeout_ms: u64,
    /// Parallel test workers
    pub workers: usize,
    /// Cross-run identity location
    pub state_file: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserConfig::default(),
            action_timeout_ms: 10_000,
            expect_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            consent_timeout_ms: 5_000,
            workers: 4,
            state_file: default_state_file(),
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> ShopcheckResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ShopcheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SHOPCHECK_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("SHOPCHECK_HEADLESS") {
            config.browser.headless = parse_bool("SHOPCHECK_HEADLESS", &raw)?;
        }
        if let Some(path) = lookup("SHOPCHECK_CHROMIUM_PATH") {
            config.browser.chromium_path = Some(path);
        }
        if let Some(raw) = lookup("SHOPCHECK_NO_SANDBOX") {
            config.browser.sandbox = !parse_bool("SHOPCHECK_NO_SANDBOX", &raw)?;
        }
        if let Some(raw) = lookup("SHOPCHECK_VIEWPORT") {
            let (w, h) = parse_viewport(&raw)?;
            config.browser = config.browser.with_viewport(w, h);
        }
        if let Some(raw) = lookup("SHOPCHECK_ACTION_TIMEOUT_MS") {
            config.action_timeout_ms = parse_num("SHOPCHECK_ACTION_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("SHOPCHECK_EXPECT_TIMEOUT_MS") {
            config.expect_timeout_ms = parse_num("SHOPCHECK_EXPECT_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("SHOPCHECK_NAVIGATION_TIMEOUT_MS") {
            config.navigation_timeout_ms = parse_num("SHOPCHECK_NAVIGATION_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("SHOPCHECK_CONSENT_TIMEOUT_MS") {
            config.consent_timeout_ms = parse_num("SHOPCHECK_CONSENT_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("SHOPCHECK_WORKERS") {
            config.workers = parse_num("SHOPCHECK_WORKERS", &raw)?;
        }
        if let Some(path) = lookup("SHOPCHECK_STATE_FILE") {
            config.state_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Set the storefront root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set browser settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set action timeout
    #[must_use]
    pub const fn with_action_timeout_ms(mut self, ms: u64) -> Self {
        self.action_timeout_ms = ms;
        self
    }

    /// Set expectation timeout
    #[must_use]
    pub const fn with_expect_timeout_ms(mut self, ms: u64) -> Self {
        self.expect_timeout_ms = ms;
        self
    }

    /// Set consent dialog timeout
    #[must_use]
    pub const fn with_consent_timeout_ms(mut self, ms: u64) -> Self {
        self.consent_timeout_ms = ms;
        self
    }

    /// Set worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set state file location
    #[must_use]
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    /// Action timeout as a duration
    #[must_use]
    pub const fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Expectation timeout as a duration
    #[must_use]
    pub const fn expect_timeout(&self) -> Duration {
        Duration::from_millis(self.expect_timeout_ms)
    }

    /// Navigation timeout as a duration
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Consent timeout as a duration
    #[must_use]
    pub const fn consent_timeout(&self) -> Duration {
        Duration::from_millis(self.consent_timeout_ms)
    }

    /// Resolve a site-relative path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path == "about:blank" {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            return format!("{base}/");
        }
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> ShopcheckResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ShopcheckError::Config {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: &str) -> ShopcheckResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ShopcheckError::Config {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Parse a `WIDTHxHEIGHT` viewport string
pub fn parse_viewport(raw: &str) -> ShopcheckResult<(u32, u32)> {
    let err = || ShopcheckError::Config {
        key: "SHOPCHECK_VIEWPORT".to_string(),
        message: format!("expected WIDTHxHEIGHT, got {raw:?}"),
    };
    let (w, h) = raw.trim().split_once(|c: char| c == 'x' || c == 'X').ok_or_else(err)?;
    let width = w.trim().parse().map_err(|_| err())?;
    let height = h.trim().parse().map_err(|_| err())?;
    if width == 0 || height == 0 {
        return Err(err());
    }
    Ok((width, height))
}
