//! Auto-retrying assertions.
//!
//! `expect(&locator).to_be_visible().await?` re-reads the page until the
//! condition holds or the expectation timeout elapses, then fails with
//! [`ShopcheckError::AssertionFailed`] describing the last observation.

use crate::locator::{Locator, Snapshot};
use crate::page::Page;
use crate::result::{ShopcheckError, ShopcheckResult};
use std::time::{Duration, Instant};

/// Poll interval for expectations
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Start an expectation on a locator
#[must_use]
pub fn expect(locator: &Locator) -> LocatorExpect<'_> {
    LocatorExpect {
        locator,
        negate: false,
        timeout: locator.page().config().expect_timeout(),
    }
}

/// Start an expectation on the page
#[must_use]
pub fn expect_page(page: &Page) -> PageExpect<'_> {
    PageExpect {
        page,
        negate: false,
        timeout: page.config().expect_timeout(),
    }
}

/// Fail unless `actual` is within `tolerance` of `expected`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) -> ShopcheckResult<()> {
    if (actual - expected).abs() <= tolerance {
        Ok(())
    } else {
        Err(ShopcheckError::assertion(format!(
            "expected {expected} (±{tolerance}), got {actual}"
        )))
    }
}

/// Assertions on a locator
#[derive(Debug)]
pub struct LocatorExpect<'a> {
    locator: &'a Locator,
    negate: bool,
    timeout: Duration,
}

impl LocatorExpect<'_> {
    /// Invert the next assertion
    #[must_use]
    pub const fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Override the retry bound
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn holds<F>(&self, description: &str, css: Option<&str>, predicate: F) -> ShopcheckResult<()>
    where
        F: Fn(&Snapshot) -> bool,
    {
        let start = Instant::now();
        let mut last: Option<Snapshot> = None;
        loop {
            match self.locator.snapshot(css).await {
                Ok(snapshot) => {
                    if predicate(&snapshot) != self.negate {
                        return Ok(());
                    }
                    last = Some(snapshot);
                }
                Err(ShopcheckError::Script { .. }) => {}
                Err(e) => return Err(e),
            }
            if start.elapsed() >= self.timeout {
                let not = if self.negate { "not " } else { "" };
                let seen = last.map_or_else(
                    || "nothing".to_string(),
                    |s| {
                        format!(
                            "{} match(es), visible={}, texts={:?}, value={:?}, css={:?}",
                            s.count, s.visible, s.texts, s.value, s.css
                        )
                    },
                );
                return Err(ShopcheckError::assertion(format!(
                    "expected {} {not}{description} within {}ms; saw {seen}",
                    self.locator,
                    self.timeout.as_millis()
                )));
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    /// First match is rendered
    pub async fn to_be_visible(self) -> ShopcheckResult<()> {
        self.holds("to be visible", None, |s| s.count > 0 && s.visible)
            .await
    }

    /// Nothing matches, or the first match is not rendered
    pub async fn to_be_hidden(self) -> ShopcheckResult<()> {
        self.holds("to be hidden", None, |s| s.count == 0 || !s.visible)
            .await
    }

    /// Some match's text contains `text` (case-sensitive, whitespace-normalized)
    pub async fn to_contain_text(self, text: &str) -> ShopcheckResult<()> {
        let needle = normalize(text);
        self.holds(&format!("to contain text {text:?}"), None, |s| {
            s.texts.iter().any(|t| t.contains(&needle))
        })
        .await
    }

    /// First match's text equals `text` after whitespace normalization
    pub async fn to_have_text(self, text: &str) -> ShopcheckResult<()> {
        let want = normalize(text);
        self.holds(&format!("to have text {text:?}"), None, |s| {
            s.texts.first().is_some_and(|t| *t == want)
        })
        .await
    }

    /// Exactly `count` matches
    pub async fn to_have_count(self, count: usize) -> ShopcheckResult<()> {
        self.holds(&format!("to have count {count}"), None, |s| {
            s.count as usize == count
        })
        .await
    }

    /// First match's value equals `value`
    pub async fn to_have_value(self, value: &str) -> ShopcheckResult<()> {
        self.holds(&format!("to have value {value:?}"), None, |s| {
            s.value.as_deref() == Some(value)
        })
        .await
    }

    /// First match has no text (or an empty value for fields)
    pub async fn to_be_empty(self) -> ShopcheckResult<()> {
        self.holds("to be empty", None, |s| s.count > 0 && s.empty)
            .await
    }

    /// First match's computed `property` equals `value`
    pub async fn to_have_css(self, property: &str, value: &str) -> ShopcheckResult<()> {
        self.holds(
            &format!("to have css {property}={value:?}"),
            Some(property),
            |s| s.css.as_deref().map(str::trim) == Some(value),
        )
        .await
    }
}

/// Assertions on the page
#[derive(Debug)]
pub struct PageExpect<'a> {
    page: &'a Page,
    negate: bool,
    timeout: Duration,
}

impl PageExpect<'_> {
    /// Invert the next assertion
    #[must_use]
    pub const fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Override the retry bound
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn holds(&self, subject: &str, pattern: &str) -> ShopcheckResult<()> {
        let re = regex::Regex::new(pattern).map_err(|e| ShopcheckError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let start = Instant::now();
        let mut last = String::new();
        loop {
            let observed = match subject {
                "title" => self.page.title().await,
                _ => self.page.url().await,
            };
            match observed {
                Ok(value) => {
                    if re.is_match(&value) != self.negate {
                        return Ok(());
                    }
                    last = value;
                }
                Err(ShopcheckError::Script { .. }) => {}
                Err(e) => return Err(e),
            }
            if start.elapsed() >= self.timeout {
                let not = if self.negate { "not " } else { "" };
                return Err(ShopcheckError::assertion(format!(
                    "expected page {subject} {not}to match /{pattern}/ within {}ms; saw {last:?}",
                    self.timeout.as_millis()
                )));
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    /// URL matches the regex `pattern`
    pub async fn to_have_url(self, pattern: &str) -> ShopcheckResult<()> {
        self.holds("url", pattern).await
    }

    /// Title matches the regex `pattern`
    pub async fn to_have_title(self, pattern: &str) -> ShopcheckResult<()> {
        self.holds("title", pattern).await
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
