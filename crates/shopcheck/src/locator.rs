//! Locator abstraction for element selection and interaction.
//!
//! # Design Philosophy
//!
//! - **Auto-Waiting**: actions poll until the first match is actionable
//! - **Non-Strict**: when several elements match, actions use the first
//! - **Lazy**: a locator is only a selector chain; it resolves on every use
//! - **Fluent API**: chainable methods for building narrower selectors
//!
//! Each action compiles to one self-contained in-page script. The script's
//! first line is a [`ScriptTag`](crate::driver::ScriptTag) naming the
//! operation, which is what [`MockDriver`](crate::driver::MockDriver) records.

use crate::driver::ScriptTag;
use crate::page::Page;
use crate::result::{ShopcheckError, ShopcheckResult};
use crate::upload::FilePayload;
use crate::wait::{poll_until, WaitOptions, WaitState, DEFAULT_POLL_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// One step of a selector chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "k", content = "v", rename_all = "snake_case")]
pub enum Step {
    /// CSS selector, searched under the current matches
    Css(String),
    /// Smallest elements whose text contains (or equals) the needle
    Text {
        /// Needle
        text: String,
        /// Whole-text equality instead of containment
        exact: bool,
    },
    /// ARIA role with optional accessible-name filter
    Role {
        /// Role name (`button`, `link`, ...)
        role: String,
        /// Accessible name substring
        name: Option<String>,
    },
    /// Keep matches whose text contains the needle
    HasText(String),
    /// Keep the nth match (negative counts from the end)
    Nth(i64),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::Text { text, exact: false } => write!(f, "text={text}"),
            Self::Text { text, exact: true } => write!(f, "text=\"{text}\""),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name={name:?}]"),
            Self::HasText(text) => write!(f, "has-text={text:?}"),
            Self::Nth(n) => write!(f, "nth={n}"),
        }
    }
}

/// Reply protocol shared by every locator script
#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    reason: Option<String>,
}

/// What an action needs from the first match before it may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Need {
    /// Runs immediately on whatever matches
    Nothing,
    /// First match in the DOM
    Attached,
    /// First match rendered
    Visible,
}

impl Need {
    const fn js(self) -> &'static str {
        match self {
            Self::Nothing => "const el = els[0];",
            Self::Attached => {
                "const el = els[0]; if (!el) { return { ok: false, reason: 'no element' }; }"
            }
            Self::Visible => {
                "const el = els[0]; if (!el) { return { ok: false, reason: 'no element' }; } \
                 if (!__visible(el)) { return { ok: false, reason: 'not visible' }; }"
            }
        }
    }
}

/// Snapshot of a locator's matches, used by expectations
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    /// Number of matches
    pub count: u64,
    /// First match is rendered
    pub visible: bool,
    /// Rendered text of every match
    #[serde(default)]
    pub texts: Vec<String>,
    /// `value` of the first match, if it has one
    #[serde(default)]
    pub value: Option<String>,
    /// First match has no text (or an empty value for inputs)
    #[serde(default)]
    pub empty: bool,
    /// Requested computed style of the first match
    #[serde(default)]
    pub css: Option<String>,
}

/// Element center in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// A lazy reference to elements on a page
///
/// Cloning is cheap; narrowing (`locator`, `nth`, `filter_has_text`) returns a
/// new locator and leaves the original untouched.
///
/// ```ignore
/// let add = page.locator(".productinfo").first().locator("a.add-to-cart");
/// add.click().await?;
/// expect(&page.locator("#cartModal")).to_be_visible().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Locator {
    page: Page,
    steps: Vec<Step>,
    timeout: Duration,
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" >> "))
    }
}

impl Locator {
    fn from_step(page: Page, step: Step) -> Self {
        let timeout = page.config().action_timeout();
        Self {
            page,
            steps: vec![step],
            timeout,
        }
    }

    /// Locator for a CSS selector
    pub fn css(page: Page, css: impl Into<String>) -> Self {
        Self::from_step(page, Step::Css(css.into()))
    }

    /// Locator for text content
    pub fn text(page: Page, text: impl Into<String>, exact: bool) -> Self {
        Self::from_step(
            page,
            Step::Text {
                text: text.into(),
                exact,
            },
        )
    }

    /// Locator for an ARIA role
    pub fn role(page: Page, role: impl Into<String>, name: Option<String>) -> Self {
        Self::from_step(
            page,
            Step::Role {
                role: role.into(),
                name,
            },
        )
    }

    fn push(&self, step: Step) -> Self {
        let mut next = self.clone();
        next.steps.push(step);
        next
    }

    /// Page this locator resolves on
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Selector chain
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Descendants matching `css`
    #[must_use]
    pub fn locator(&self, css: impl Into<String>) -> Self {
        self.push(Step::Css(css.into()))
    }

    /// Descendants containing `text`
    #[must_use]
    pub fn get_by_text(&self, text: impl Into<String>) -> Self {
        self.push(Step::Text {
            text: text.into(),
            exact: false,
        })
    }

    /// Keep matches whose text contains `text`
    #[must_use]
    pub fn filter_has_text(&self, text: impl Into<String>) -> Self {
        self.push(Step::HasText(text.into()))
    }

    /// Keep only the nth match (0-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.push(Step::Nth(index as i64))
    }

    /// Keep only the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.push(Step::Nth(0))
    }

    /// Keep only the last match
    #[must_use]
    pub fn last(&self) -> Self {
        self.push(Step::Nth(-1))
    }

    /// Override the auto-wait bound for this locator
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Auto-wait bound
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    // =========================================================================
    // Script assembly
    // =========================================================================

    fn script(&self, op: &str, arg: Option<String>, args: &serde_json::Value, need: Need, body: &str) -> String {
        let tag = ScriptTag::new(op, self.to_string(), arg);
        let steps = serde_json::to_string(&self.steps).unwrap_or_else(|_| "[]".to_string());
        format!(
            "{header}(() => {{ {PRELUDE} const args = {args}; const els = __resolve({steps}); {guard} {body} }})()",
            header = tag.header(),
            guard = need.js(),
        )
    }

    async fn run(&self, script: &str, op: &str) -> ShopcheckResult<serde_json::Value> {
        let driver = self.page.driver();
        let options = WaitOptions::within(self.timeout).with_poll_interval(DEFAULT_POLL_INTERVAL_MS);
        let what = format!("{op} on {self}");
        let last_reason = Mutex::new(String::new());
        let reason = &last_reason;
        let result = poll_until(&what, &options, || async move {
            let note = |why: String| {
                if let Ok(mut r) = reason.lock() {
                    *r = why;
                }
            };
            match driver.evaluate(script).await {
                Ok(raw) => {
                    let reply: Reply = serde_json::from_value(raw).map_err(|e| {
                        ShopcheckError::script(format!("{op}: malformed reply: {e}"))
                    })?;
                    if reply.ok {
                        Ok(Some(reply.value))
                    } else {
                        note(reply.reason.unwrap_or_default());
                        Ok(None)
                    }
                }
                // the document may be mid-navigation; try again
                Err(ShopcheckError::Script { message }) => {
                    note(message);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await;
        let last = last_reason.lock().map(|r| r.clone()).unwrap_or_default();
        match result {
            Err(ShopcheckError::Timeout { ms, .. }) if !last.is_empty() => {
                Err(ShopcheckError::Timeout {
                    what: format!("{what} ({last})"),
                    ms,
                })
            }
            other => other,
        }
    }

    async fn act(
        &self,
        op: &str,
        arg: Option<String>,
        args: serde_json::Value,
        need: Need,
        body: &str,
    ) -> ShopcheckResult<serde_json::Value> {
        tracing::debug!(op, locator = %self, "locator action");
        let script = self.script(op, arg, &args, need, body);
        self.run(&script, op).await
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Click the first match once it is visible
    ///
    /// # Errors
    ///
    /// Returns a timeout error if nothing visible matches within the
    /// locator's bound, or a script error if the click itself throws
    pub async fn click(&self) -> ShopcheckResult<()> {
        self.act(
            "click",
            None,
            serde_json::Value::Null,
            Need::Visible,
            "el.scrollIntoView({ block: 'center', inline: 'center' }); el.click(); \
             return { ok: true, value: null };",
        )
        .await?;
        Ok(())
    }

    /// Replace the value of the first match
    ///
    /// Fires `input` and `change` so the page's own handlers see the edit.
    ///
    /// # Errors
    ///
    /// Returns a timeout error if no visible match appears
    pub async fn fill(&self, value: &str) -> ShopcheckResult<()> {
        self.act(
            "fill",
            Some(value.to_string()),
            serde_json::json!({ "value": value }),
            Need::Visible,
            "el.focus(); \
             const d = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
             if (d && d.set) { d.set.call(el, args.value); } else { el.value = args.value; } \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); \
             return { ok: true, value: null };",
        )
        .await?;
        Ok(())
    }

    /// Press a key on the first match; `Enter` submits its form
    pub async fn press(&self, key: &str) -> ShopcheckResult<()> {
        self.act(
            "press",
            Some(key.to_string()),
            serde_json::json!({ "key": key }),
            Need::Visible,
            "el.focus(); \
             const o = { key: args.key, bubbles: true, cancelable: true }; \
             const go = el.dispatchEvent(new KeyboardEvent('keydown', o)); \
             el.dispatchEvent(new KeyboardEvent('keyup', o)); \
             if (go && args.key === 'Enter' && el.form) { \
               if (el.form.requestSubmit) { el.form.requestSubmit(); } else { el.form.submit(); } \
             } \
             return { ok: true, value: null };",
        )
        .await?;
        Ok(())
    }

    /// Ensure the first match (checkbox or radio) is checked; never unchecks
    pub async fn check(&self) -> ShopcheckResult<()> {
        self.act(
            "check",
            None,
            serde_json::Value::Null,
            Need::Visible,
            "if (!el.checked) { el.click(); } \
             return el.checked ? { ok: true, value: true } : { ok: false, reason: 'not checked' };",
        )
        .await?;
        Ok(())
    }

    /// Select an option of the first `<select>` match by value or label
    ///
    /// # Errors
    ///
    /// Returns an error if the match has no option with that value or label
    pub async fn select_option(&self, option: &str) -> ShopcheckResult<()> {
        self.act(
            "select_option",
            Some(option.to_string()),
            serde_json::json!({ "option": option }),
            Need::Attached,
            "const opts = Array.from(el.options || []); \
             const opt = opts.find(o => o.value === args.option) || \
                         opts.find(o => __norm(o.textContent) === args.option); \
             if (!opt) { return { ok: false, reason: 'no option ' + args.option }; } \
             el.value = opt.value; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); \
             return { ok: true, value: opt.value };",
        )
        .await?;
        Ok(())
    }

    /// Move the real pointer over the center of the first match
    pub async fn hover(&self) -> ShopcheckResult<()> {
        let point = self.center().await?;
        self.page.driver().mouse_move(point.x, point.y).await
    }

    /// Center of the first visible match after scrolling it into view
    pub async fn center(&self) -> ShopcheckResult<Point> {
        let value = self
            .act(
                "box",
                None,
                serde_json::Value::Null,
                Need::Visible,
                "el.scrollIntoView({ block: 'center', inline: 'center' }); \
                 const r = el.getBoundingClientRect(); \
                 return { ok: true, value: { x: r.left + r.width / 2, y: r.top + r.height / 2 } };",
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Scroll the first match into view
    pub async fn scroll_into_view(&self) -> ShopcheckResult<()> {
        self.act(
            "scroll_into_view",
            None,
            serde_json::Value::Null,
            Need::Attached,
            "el.scrollIntoView({ block: 'center' }); return { ok: true, value: null };",
        )
        .await?;
        Ok(())
    }

    /// Attach files to the first `<input type=file>` match
    ///
    /// # Errors
    ///
    /// Returns a script error if the match does not accept a file list
    pub async fn set_input_files(&self, files: &[FilePayload]) -> ShopcheckResult<()> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        let descriptors: Vec<serde_json::Value> =
            files.iter().map(FilePayload::to_js_descriptor).collect();
        self.act(
            "set_input_files",
            Some(names.join(",")),
            serde_json::json!({ "files": descriptors }),
            Need::Attached,
            "const dt = new DataTransfer(); \
             for (const f of args.files) { \
               const bin = atob(f.b64); const bytes = new Uint8Array(bin.length); \
               for (let i = 0; i < bin.length; i++) { bytes[i] = bin.charCodeAt(i); } \
               dt.items.add(new File([bytes], f.name, { type: f.type })); \
             } \
             el.files = dt.files; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); \
             return { ok: true, value: el.files.length };",
        )
        .await?;
        Ok(())
    }

    /// Wait until the locator reaches `state`
    ///
    /// Unlike actions this uses the caller's `timeout`, not the locator's.
    /// Wrap it in [`crate::wait::optional`] when absence is acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`ShopcheckError::Timeout`] when the state is not reached
    pub async fn wait_for(&self, state: WaitState, timeout: Duration) -> ShopcheckResult<()> {
        let script = self.script(
            "probe",
            Some(state.as_str().to_string()),
            &serde_json::Value::Null,
            Need::Nothing,
            "return { ok: true, value: { count: els.length, visible: __visible(el) } };",
        );
        let options = WaitOptions::within(timeout);
        let what = format!("{self} to be {}", state.as_str());
        let script = &script;
        poll_until(&what, &options, || async move {
            match self.probe_once(script).await? {
                Some((count, visible)) if state.is_satisfied(count, visible) => Ok(Some(())),
                _ => Ok(None),
            }
        })
        .await
    }

    async fn probe_once(&self, script: &str) -> ShopcheckResult<Option<(u64, bool)>> {
        match self.page.driver().evaluate(script).await {
            Ok(raw) => {
                let reply: Reply = serde_json::from_value(raw)?;
                let count = reply
                    .value
                    .get("count")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(0);
                let visible = reply
                    .value
                    .get("visible")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false);
                Ok(Some((count, visible)))
            }
            Err(ShopcheckError::Script { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    async fn string_query(&self, op: &str, arg: Option<String>, args: serde_json::Value, body: &str) -> ShopcheckResult<String> {
        let value = self.act(op, arg, args, Need::Attached, body).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Rendered text of the first match (waits for it to exist)
    pub async fn inner_text(&self) -> ShopcheckResult<String> {
        self.string_query(
            "inner_text",
            None,
            serde_json::Value::Null,
            "return { ok: true, value: String(el.innerText != null ? el.innerText : el.textContent) };",
        )
        .await
    }

    /// Raw text content of the first match
    pub async fn text_content(&self) -> ShopcheckResult<String> {
        self.string_query(
            "text_content",
            None,
            serde_json::Value::Null,
            "return { ok: true, value: String(el.textContent || '') };",
        )
        .await
    }

    /// Current value of the first input match
    pub async fn input_value(&self) -> ShopcheckResult<String> {
        self.string_query(
            "input_value",
            None,
            serde_json::Value::Null,
            "return { ok: true, value: String(el.value == null ? '' : el.value) };",
        )
        .await
    }

    /// Attribute of the first match (empty when absent)
    pub async fn get_attribute(&self, name: &str) -> ShopcheckResult<String> {
        self.string_query(
            "attribute",
            Some(name.to_string()),
            serde_json::json!({ "name": name }),
            "return { ok: true, value: el.getAttribute(args.name) || '' };",
        )
        .await
    }

    /// Computed style property of the first match
    pub async fn css_value(&self, property: &str) -> ShopcheckResult<String> {
        self.string_query(
            "css_value",
            Some(property.to_string()),
            serde_json::json!({ "prop": property }),
            "return { ok: true, value: getComputedStyle(el).getPropertyValue(args.prop) };",
        )
        .await
    }

    /// Whether the first checkbox/radio match is checked
    pub async fn is_checked(&self) -> ShopcheckResult<bool> {
        let value = self
            .act(
                "is_checked",
                None,
                serde_json::Value::Null,
                Need::Attached,
                "return { ok: true, value: !!el.checked };",
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Number of matches right now
    pub async fn count(&self) -> ShopcheckResult<usize> {
        let value = self
            .act(
                "count",
                None,
                serde_json::Value::Null,
                Need::Nothing,
                "return { ok: true, value: els.length };",
            )
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    /// Whether the first match is rendered right now
    pub async fn is_visible(&self) -> ShopcheckResult<bool> {
        let value = self
            .act(
                "is_visible",
                None,
                serde_json::Value::Null,
                Need::Nothing,
                "return { ok: true, value: __visible(el) };",
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Rendered text of every match right now
    pub async fn all_inner_texts(&self) -> ShopcheckResult<Vec<String>> {
        let value = self
            .act(
                "all_inner_texts",
                None,
                serde_json::Value::Null,
                Need::Nothing,
                "return { ok: true, value: els.map(e => String(e.innerText != null ? e.innerText : e.textContent)) };",
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// One locator per current match
    ///
    /// Each returned locator is pinned with `nth`, so it keeps pointing at the
    /// same position even if the list later changes length.
    pub async fn all(&self) -> ShopcheckResult<Vec<Self>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i)).collect())
    }

    /// Everything expectations look at, in one round trip, without waiting
    pub async fn snapshot(&self, css_property: Option<&str>) -> ShopcheckResult<Snapshot> {
        let script = self.script(
            "snapshot",
            css_property.map(ToString::to_string),
            &serde_json::json!({ "prop": css_property }),
            Need::Nothing,
            "const isField = el && ['INPUT', 'TEXTAREA', 'SELECT'].includes(el.tagName); \
             return { ok: true, value: { \
               count: els.length, \
               visible: __visible(el), \
               texts: els.map(e => __norm(e.innerText != null ? e.innerText : e.textContent)), \
               value: el && el.value != null ? String(el.value) : null, \
               empty: !!el && (isField ? String(el.value || '') === '' : __norm(el.textContent) === ''), \
               css: el && args.prop ? getComputedStyle(el).getPropertyValue(args.prop) : null \
             } };",
        );
        let raw = self.page.driver().evaluate(&script).await?;
        let reply: Reply = serde_json::from_value(raw)?;
        if reply.value.is_null() {
            return Ok(Snapshot::default());
        }
        Ok(serde_json::from_value(reply.value)?)
    }
}

/// Helpers shared by every locator script
const PRELUDE: &str = r#"
const __norm = (s) => String(s == null ? '' : s).replace(/\s+/g, ' ').trim();
const __visible = (e) => {
  if (!e || !e.isConnected) { return false; }
  const st = getComputedStyle(e);
  if (st.visibility === 'hidden' || st.display === 'none') { return false; }
  const r = e.getBoundingClientRect();
  return r.width > 0 && r.height > 0;
};
const __roles = {
  button: 'button,input[type=button],input[type=submit],input[type=reset],[role=button]',
  link: 'a[href],[role=link]',
  textbox: 'input:not([type]),input[type=text],input[type=email],input[type=password],textarea,[role=textbox]',
  checkbox: 'input[type=checkbox],[role=checkbox]',
  heading: 'h1,h2,h3,h4,h5,h6,[role=heading]',
};
const __label = (e) => __norm(e.getAttribute('aria-label') || e.innerText || e.value || e.textContent);
const __uniq = (list) => Array.from(new Set(list));
const __skip = ['SCRIPT', 'STYLE', 'HEAD', 'TITLE', 'NOSCRIPT'];
const __byText = (root, needle, exact) => {
  const want = __norm(needle).toLowerCase();
  const hit = (e) => {
    const t = __norm(e.textContent).toLowerCase();
    return exact ? t === want : t.includes(want);
  };
  return Array.from(root.querySelectorAll('*'))
    .filter(e => !__skip.includes(e.tagName))
    .filter(e => hit(e) && !Array.from(e.children).some(c => hit(c)));
};
const __resolve = (steps) => {
  let set = [document];
  for (const s of steps) {
    if (s.k === 'css') {
      set = __uniq(set.flatMap(r => Array.from(r.querySelectorAll(s.v))));
    } else if (s.k === 'text') {
      set = __uniq(set.flatMap(r => __byText(r, s.v.text, s.v.exact)));
    } else if (s.k === 'role') {
      const sel = __roles[s.v.role] || ('[role="' + s.v.role + '"]');
      set = __uniq(set.flatMap(r => Array.from(r.querySelectorAll(sel))));
      if (s.v.name != null) {
        const n = __norm(s.v.name).toLowerCase();
        set = set.filter(e => __label(e).toLowerCase().includes(n));
      }
    } else if (s.k === 'has_text') {
      const n = __norm(s.v).toLowerCase();
      set = set.filter(e => __norm(e.textContent).toLowerCase().includes(n));
    } else if (s.k === 'nth') {
      const i = s.v < 0 ? set.length + s.v : s.v;
      set = (i >= 0 && i < set.length) ? [set[i]] : [];
    }
  }
  return set.filter(e => e !== document);
};
"#;
