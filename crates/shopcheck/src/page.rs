//! The active browser page.
//!
//! A cheap, clonable handle over the shared driver. Every page area holds one
//! and builds its locators from it.

use crate::config::SuiteConfig;
use crate::dialog::{DialogAction, DialogRecord};
use crate::driver::{Cookie, Driver};
use crate::locator::Locator;
use crate::network::RouteRule;
use crate::result::{ShopcheckError, ShopcheckResult};
use crate::wait::LoadState;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Handle on the page under test
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn Driver>,
    config: Arc<SuiteConfig>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("base_url", &self.config.base_url)
            .field("driver", &self.driver)
            .finish()
    }
}

impl Page {
    /// Bind a driver to a configuration
    pub fn new(driver: Arc<dyn Driver>, config: SuiteConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Navigate to a site-relative path or absolute URL, waiting for `load`
    pub async fn goto(&self, path: &str) -> ShopcheckResult<()> {
        self.goto_with(path, LoadState::Load).await
    }

    /// Navigate and wait for a specific load state
    pub async fn goto_with(&self, path: &str, state: LoadState) -> ShopcheckResult<()> {
        let url = self.config.url_for(path);
        tracing::debug!(%url, %state, "goto");
        self.driver
            .goto(&url, state, self.config.navigation_timeout())
            .await
    }

    /// Current URL
    pub async fn url(&self) -> ShopcheckResult<String> {
        self.driver.current_url().await
    }

    /// Document title
    pub async fn title(&self) -> ShopcheckResult<String> {
        self.driver.title().await
    }

    /// Locate elements by CSS selector
    #[must_use]
    pub fn locator(&self, css: impl Into<String>) -> Locator {
        Locator::css(self.clone(), css)
    }

    /// Locate the smallest elements whose text contains `text` (case-insensitive)
    #[must_use]
    pub fn get_by_text(&self, text: impl Into<String>) -> Locator {
        Locator::text(self.clone(), text, false)
    }

    /// Locate elements whose whole text equals `text`
    #[must_use]
    pub fn get_by_exact_text(&self, text: impl Into<String>) -> Locator {
        Locator::text(self.clone(), text, true)
    }

    /// Locate elements by ARIA role and accessible name
    #[must_use]
    pub fn get_by_role(&self, role: impl Into<String>, name: Option<&str>) -> Locator {
        Locator::role(self.clone(), role, name.map(ToString::to_string))
    }

    /// Rendered text of the first element matching `css`
    pub async fn inner_text(&self, css: &str) -> ShopcheckResult<String> {
        self.locator(css).inner_text().await
    }

    /// Run a script in the page
    pub async fn evaluate(&self, script: &str) -> ShopcheckResult<serde_json::Value> {
        self.driver.evaluate(script).await
    }

    /// Scroll the window to a vertical offset
    pub async fn scroll_to(&self, y: i64) -> ShopcheckResult<()> {
        self.driver
            .evaluate(&format!("window.scrollTo(0, {y}); true"))
            .await?;
        Ok(())
    }

    /// Current vertical scroll offset
    pub async fn scroll_y(&self) -> ShopcheckResult<f64> {
        let value = self.driver.evaluate("window.scrollY").await?;
        Ok(value.as_f64().unwrap_or(0.0))
    }

    /// Resize the viewport
    pub async fn set_viewport_size(&self, width: u32, height: u32) -> ShopcheckResult<()> {
        tracing::debug!(width, height, "viewport");
        self.driver.set_viewport(width, height).await
    }

    /// Answer the next native dialog with `action`
    pub async fn once_dialog(&self, action: DialogAction) -> ShopcheckResult<()> {
        self.driver.arm_dialog(action).await
    }

    /// Dialogs answered so far
    #[must_use]
    pub fn dialogs(&self) -> Vec<DialogRecord> {
        self.driver.dialogs()
    }

    /// Rewrite matching outgoing requests
    pub async fn route(&self, rule: RouteRule) -> ShopcheckResult<()> {
        tracing::debug!(pattern = %rule.pattern.to_regex_source(), "route");
        self.driver.route(rule).await
    }

    /// Cookies of the current session
    pub async fn cookies(&self) -> ShopcheckResult<Vec<Cookie>> {
        self.driver.cookies().await
    }

    /// Poll until the URL matches `pattern` (a regex, searched)
    pub async fn wait_for_url(&self, pattern: &str) -> ShopcheckResult<String> {
        self.wait_for_url_within(pattern, self.config.navigation_timeout())
            .await
    }

    /// Like [`Page::wait_for_url`], bounded by `timeout` instead of the
    /// navigation timeout
    pub async fn wait_for_url_within(
        &self,
        pattern: &str,
        timeout: Duration,
    ) -> ShopcheckResult<String> {
        let re = regex::Regex::new(pattern).map_err(|e| ShopcheckError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let options = crate::wait::WaitOptions::within(timeout);
        let driver = &self.driver;
        let re = &re;
        crate::wait::poll_until(&format!("url ~ /{pattern}/"), &options, || async move {
            let url = driver.current_url().await?;
            Ok(re.is_match(&url).then_some(url))
        })
        .await
    }

    /// POST a form to a site path from outside the page, carrying its
    /// session cookies.
    ///
    /// Redirects are followed, so the response describes where the request
    /// actually ended up.
    #[cfg(feature = "browser")]
    pub async fn post_with_session(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> ShopcheckResult<SessionResponse> {
        let url = self.config.url_for(path);
        let cookies = self.cookies().await?;
        let mut request = reqwest::Client::new()
            .post(&url)
            .header("Cookie", crate::driver::cookie_header(&cookies))
            .form(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.map_err(|e| ShopcheckError::Request {
            message: format!("{url}: {e}"),
        })?;
        let outcome = SessionResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
        };
        tracing::info!(%url, status = outcome.status, final_url = %outcome.final_url, "session POST");
        Ok(outcome)
    }
}

/// Where a [`Page::post_with_session`] request ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// Status of the last response in the redirect chain
    pub status: u16,
    /// URL of the last response
    pub final_url: String,
}

impl SessionResponse {
    /// 2xx final status
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the chain ended on a path containing `fragment`
    #[must_use]
    pub fn landed_on(&self, fragment: &str) -> bool {
        self.final_url.contains(fragment)
    }
}
