//! Wait Mechanisms
//!
//! Bounded polling used by every locator action and expectation, plus the
//! single primitive for elements that may legitimately never appear.

use crate::result::{ShopcheckError, ShopcheckResult};
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }

    /// `document.readyState` condition that satisfies this state
    #[must_use]
    pub const fn ready_state_check(&self) -> &'static str {
        match self {
            Self::Load => "document.readyState === 'complete'",
            Self::DomContentLoaded => "document.readyState !== 'loading'",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// ELEMENT STATE
// =============================================================================

/// Element states a locator can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaitState {
    /// At least one match is in the DOM
    Attached,
    /// No match is in the DOM
    Detached,
    /// The first match is rendered with a non-empty box
    #[default]
    Visible,
    /// No match, or the first match is not rendered
    Hidden,
}

impl WaitState {
    /// Check the state against a probe of the first match
    #[must_use]
    pub const fn is_satisfied(&self, count: u64, first_visible: bool) -> bool {
        match self {
            Self::Attached => count > 0,
            Self::Detached => count == 0,
            Self::Visible => count > 0 && first_visible,
            Self::Hidden => count == 0 || !first_visible,
        }
    }

    /// Lowercase name used in messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options bounded by a duration
    #[must_use]
    pub fn within(timeout: Duration) -> Self {
        Self::default().with_timeout(timeout.as_millis() as u64)
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `probe` until it yields a value or the timeout elapses.
///
/// The probe is always run at least once, so a zero timeout still checks the
/// current state.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    options: &WaitOptions,
    mut probe: F,
) -> ShopcheckResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopcheckResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        if start.elapsed() >= options.timeout() {
            return Err(ShopcheckError::Timeout {
                what: what.to_string(),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Await an element-level wait that is allowed to come up empty.
///
/// A timeout becomes `Ok(false)`; any other failure propagates. This is the
/// only place expected absence is tolerated.
pub async fn optional<F>(what: &str, wait: F) -> ShopcheckResult<bool>
where
    F: Future<Output = ShopcheckResult<()>>,
{
    match wait.await {
        Ok(()) => Ok(true),
        Err(e) if e.is_timeout() => {
            tracing::debug!(what, "optional element not present");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
