//! Driver - Abstract Browser Automation Trait
//!
//! Everything above this module talks to the browser through [`Driver`], so
//! page areas and composite actions can be exercised against [`MockDriver`]
//! without a browser.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Driver (Abstract Trait)                                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐        ┌─────────────────────┐      │
//! │  │  ChromiumDriver     │        │  MockDriver         │      │
//! │  │  (feature browser)  │        │  (unit tests)       │      │
//! │  │  CDP via            │        │  records calls,     │      │
//! │  │  chromiumoxide      │        │  scripted replies   │      │
//! │  └─────────────────────┘        └─────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::dialog::{DialogAction, DialogRecord, DialogSlot, DialogType};
use crate::network::RouteRule;
use crate::result::ShopcheckResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// First-line marker of scripts issued by locators
pub const SCRIPT_TAG_PREFIX: &str = "// shopcheck:";

/// Machine-readable header naming what a locator script does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTag {
    /// Operation name (`click`, `fill`, ...)
    pub op: String,
    /// Locator description
    pub target: String,
    /// Operation argument, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
}

impl ScriptTag {
    /// Create a tag
    pub fn new(op: impl Into<String>, target: impl Into<String>, arg: Option<String>) -> Self {
        Self {
            op: op.into(),
            target: target.into(),
            arg,
        }
    }

    /// Header line prepended to the script
    #[must_use]
    pub fn header(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("{SCRIPT_TAG_PREFIX}{json}\n")
    }

    /// Recover the tag from a script's first line
    #[must_use]
    pub fn parse(script: &str) -> Option<Self> {
        let first = script.lines().next()?;
        let json = first.strip_prefix(SCRIPT_TAG_PREFIX)?;
        serde_json::from_str(json).ok()
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{} {} = {}", self.op, self.target, arg),
            None => write!(f, "{} {}", self.op, self.target),
        }
    }
}

/// A browser cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Owning domain
    pub domain: String,
}

impl Cookie {
    /// Create a cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
        }
    }
}

/// Render cookies as a `Cookie` request header value
#[must_use]
pub fn cookie_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Abstract browser driver
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Navigate and wait for the load state
    async fn goto(&self, url: &str, state: LoadState, timeout: Duration) -> ShopcheckResult<()>;

    /// Execute JavaScript in page context and return its JSON value
    async fn evaluate(&self, script: &str) -> ShopcheckResult<serde_json::Value>;

    /// Get current URL
    async fn current_url(&self) -> ShopcheckResult<String>;

    /// Get document title
    async fn title(&self) -> ShopcheckResult<String>;

    /// Move the pointer to viewport coordinates
    async fn mouse_move(&self, x: f64, y: f64) -> ShopcheckResult<()>;

    /// Resize the viewport
    async fn set_viewport(&self, width: u32, height: u32) -> ShopcheckResult<()>;

    /// Answer the next dialog with `action`
    async fn arm_dialog(&self, action: DialogAction) -> ShopcheckResult<()>;

    /// Dialogs answered so far
    fn dialogs(&self) -> Vec<DialogRecord>;

    /// Install a request rewrite for this page and later navigations
    async fn route(&self, rule: RouteRule) -> ShopcheckResult<()>;

    /// Cookies visible to the current page
    async fn cookies(&self) -> ShopcheckResult<Vec<Cookie>>;

    /// Close the browser
    async fn close(&self) -> ShopcheckResult<()>;
}

/// A recorded driver interaction
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// Navigation
    Goto {
        /// Target URL
        url: String,
        /// Awaited load state
        state: LoadState,
    },
    /// Tagged locator script
    Action(ScriptTag),
    /// Untagged script
    Evaluate(String),
    /// Pointer move
    MouseMove {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
    },
    /// Viewport resize
    SetViewport {
        /// Width
        width: u32,
        /// Height
        height: u32,
    },
    /// Dialog arming
    ArmDialog(DialogAction),
    /// Route installation
    Route(RouteRule),
    /// Browser closed
    Close,
}

impl fmt::Display for DriverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goto { url, .. } => write!(f, "goto {url}"),
            Self::Action(tag) => write!(f, "{tag}"),
            Self::Evaluate(script) => write!(f, "evaluate {script}"),
            Self::MouseMove { x, y } => write!(f, "mouse_move {x},{y}"),
            Self::SetViewport { width, height } => write!(f, "viewport {width}x{height}"),
            Self::ArmDialog(action) => write!(f, "arm_dialog {action:?}"),
            Self::Route(rule) => write!(f, "route {}", rule.pattern.to_regex_source()),
            Self::Close => write!(f, "close"),
        }
    }
}

type Responder = Arc<dyn Fn(&ScriptTag) -> Option<serde_json::Value> + Send + Sync>;

/// Mock driver for unit testing
///
/// Locator scripts are answered with a successful reply carrying a neutral
/// value for their operation unless a responder supplies another reply.
#[derive(Clone, Default)]
pub struct MockDriver {
    url: Arc<Mutex<String>>,
    title: Arc<Mutex<String>>,
    calls: Arc<Mutex<Vec<DriverCall>>>,
    cookies: Arc<Mutex<Vec<Cookie>>>,
    eval_result: Arc<Mutex<serde_json::Value>>,
    dialogs: DialogSlot,
    responder: Option<Responder>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("calls", &self.history().len())
            .field("responder", &self.responder.is_some())
            .finish()
    }
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer locator scripts through `responder`; `None` falls back to the default reply
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ScriptTag) -> Option<serde_json::Value> + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Successful locator reply
    #[must_use]
    pub fn ok(value: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "ok": true, "value": value })
    }

    /// Not-yet-actionable locator reply
    #[must_use]
    pub fn pending(reason: &str) -> serde_json::Value {
        serde_json::json!({ "ok": false, "reason": reason })
    }

    /// Set the document title
    pub fn set_title(&self, title: impl Into<String>) {
        if let Ok(mut t) = self.title.lock() {
            *t = title.into();
        }
    }

    /// Set the current URL without recording a navigation
    pub fn set_url(&self, url: impl Into<String>) {
        if let Ok(mut u) = self.url.lock() {
            *u = url.into();
        }
    }

    /// Set the value returned for untagged scripts
    pub fn set_eval_result(&self, value: serde_json::Value) {
        if let Ok(mut v) = self.eval_result.lock() {
            *v = value;
        }
    }

    /// Add a cookie
    pub fn add_cookie(&self, cookie: Cookie) {
        if let Ok(mut c) = self.cookies.lock() {
            c.push(cookie);
        }
    }

    /// Simulate the page raising a dialog
    pub fn raise_dialog(&self, dialog_type: DialogType, message: &str) -> DialogAction {
        self.dialogs.resolve(dialog_type, message)
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<DriverCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Call history rendered as strings
    #[must_use]
    pub fn history_lines(&self) -> Vec<String> {
        self.history().iter().map(ToString::to_string).collect()
    }

    /// Locator actions only, in order
    #[must_use]
    pub fn actions(&self) -> Vec<ScriptTag> {
        self.history()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Action(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Check if a call starting with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history_lines().iter().any(|c| c.starts_with(prefix))
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        if let Ok(mut c) = self.calls.lock() {
            c.clear();
        }
    }

    fn record(&self, call: DriverCall) {
        if let Ok(mut c) = self.calls.lock() {
            c.push(call);
        }
    }

    fn default_value(op: &str) -> serde_json::Value {
        match op {
            "count" => serde_json::json!(1),
            "is_visible" | "is_checked" => serde_json::json!(true),
            "all_inner_texts" => serde_json::json!([]),
            "probe" => serde_json::json!({ "count": 1, "visible": true }),
            "box" => serde_json::json!({ "x": 10.0, "y": 20.0 }),
            "inner_text" | "text_content" | "input_value" | "css_value" | "attribute" => {
                serde_json::json!("")
            }
            _ => serde_json::Value::Null,
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&self, url: &str, state: LoadState, _timeout: Duration) -> ShopcheckResult<()> {
        self.record(DriverCall::Goto {
            url: url.to_string(),
            state,
        });
        self.set_url(url);
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> ShopcheckResult<serde_json::Value> {
        if let Some(tag) = ScriptTag::parse(script) {
            self.record(DriverCall::Action(tag.clone()));
            let reply = self
                .responder
                .as_ref()
                .and_then(|r| r(&tag))
                .unwrap_or_else(|| Self::ok(Self::default_value(&tag.op)));
            return Ok(reply);
        }
        let summary: String = script.chars().take(60).collect();
        self.record(DriverCall::Evaluate(summary));
        Ok(self
            .eval_result
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default())
    }

    async fn current_url(&self) -> ShopcheckResult<String> {
        Ok(self.url.lock().map(|u| u.clone()).unwrap_or_default())
    }

    async fn title(&self) -> ShopcheckResult<String> {
        Ok(self.title.lock().map(|t| t.clone()).unwrap_or_default())
    }

    async fn mouse_move(&self, x: f64, y: f64) -> ShopcheckResult<()> {
        self.record(DriverCall::MouseMove { x, y });
        Ok(())
    }

    async fn set_viewport(&self, width: u32, height: u32) -> ShopcheckResult<()> {
        self.record(DriverCall::SetViewport { width, height });
        Ok(())
    }

    async fn arm_dialog(&self, action: DialogAction) -> ShopcheckResult<()> {
        self.record(DriverCall::ArmDialog(action.clone()));
        self.dialogs.arm(action);
        Ok(())
    }

    fn dialogs(&self) -> Vec<DialogRecord> {
        self.dialogs.handled()
    }

    async fn route(&self, rule: RouteRule) -> ShopcheckResult<()> {
        rule.install_script()?;
        self.record(DriverCall::Route(rule));
        Ok(())
    }

    async fn cookies(&self) -> ShopcheckResult<Vec<Cookie>> {
        Ok(self.cookies.lock().map(|c| c.clone()).unwrap_or_default())
    }

    async fn close(&self) -> ShopcheckResult<()> {
        self.record(DriverCall::Close);
        Ok(())
    }
}
