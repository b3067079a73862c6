//! Browser control for headless testing.
//!
//! Real Chromium over the Chrome `DevTools` Protocol via chromiumoxide.
//! Compiled only with the `browser` feature; unit tests use
//! [`MockDriver`](crate::driver::MockDriver) instead.

use crate::config::BrowserConfig;
use crate::dialog::{DialogAction, DialogRecord, DialogSlot, DialogType};
use crate::driver::{Cookie, Driver};
use crate::network::RouteRule;
use crate::result::{ShopcheckError, ShopcheckResult};
use crate::wait::{poll_until, LoadState, WaitOptions};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventJavascriptDialogOpening,
    HandleJavaScriptDialogParams, NavigateParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Viewports narrower than this are emulated as mobile
const MOBILE_MAX_WIDTH: u32 = 768;

fn page_err(e: impl std::fmt::Display) -> ShopcheckError {
    ShopcheckError::Page {
        message: e.to_string(),
    }
}

/// Driver backed by a real Chromium instance
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: CdpPage,
    dialogs: DialogSlot,
    handler: JoinHandle<()>,
    dialog_listener: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a browser and open one blank page
    ///
    /// # Errors
    ///
    /// Returns error if browser cannot be launched
    pub async fn launch(config: &BrowserConfig) -> ShopcheckResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| ShopcheckError::BrowserLaunch { message: e })?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| ShopcheckError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(page_err)?;

        let dialogs = DialogSlot::new();
        let mut events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(page_err)?;
        let listener_page = page.clone();
        let listener_slot = dialogs.clone();
        let dialog_listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let kind = DialogType::from_protocol(&format!("{:?}", event.r#type).to_lowercase());
                let action = listener_slot.resolve(kind, event.message.clone());
                tracing::info!(%kind, message = %event.message, ?action, "dialog");
                let mut params = HandleJavaScriptDialogParams::new(action.accepts());
                params.prompt_text = action.prompt_text().map(ToString::to_string);
                if let Err(e) = listener_page.execute(params).await {
                    tracing::warn!(error = %e, "failed to answer dialog");
                }
            }
        });

        let driver = Self {
            browser: Mutex::new(browser),
            page,
            dialogs,
            handler,
            dialog_listener,
        };
        driver
            .set_viewport(config.viewport_width, config.viewport_height)
            .await?;
        tracing::info!(headless = config.headless, "browser launched");
        Ok(driver)
    }

    async fn eval_value(&self, script: &str) -> ShopcheckResult<serde_json::Value> {
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(ShopcheckError::script)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| ShopcheckError::script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }
}

/// Set on the current document just before navigating away
const STALE_MARKER: &str = "window.__shopcheckStale = true";

/// True once a fresh document (without the stale marker) reaches `state`
fn ready_expression(state: LoadState) -> String {
    format!("!window.__shopcheckStale && {}", state.ready_state_check())
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn goto(&self, url: &str, state: LoadState, timeout: Duration) -> ShopcheckResult<()> {
        let nav_err = |message: String| ShopcheckError::Navigation {
            url: url.to_string(),
            message,
        };

        // marks the outgoing document so the wait below cannot see it
        if let Err(e) = self.eval_value(STALE_MARKER).await {
            tracing::warn!(%url, error = %e, "outgoing document not marked stale");
        }

        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| nav_err(e.to_string()))?;
        if let Some(text) = response.result.error_text.clone() {
            return Err(nav_err(text));
        }

        let ready = ready_expression(state);
        let ready = &ready;
        poll_until(
            &format!("{url} to reach {state}"),
            &WaitOptions::within(timeout),
            || async move {
                match self.eval_value(ready).await {
                    Ok(value) => Ok(value.as_bool().unwrap_or(false).then_some(())),
                    Err(ShopcheckError::Script { .. }) => Ok(None),
                    Err(e) => Err(e),
                }
            },
        )
        .await
        .map_err(|e| match e {
            ShopcheckError::Timeout { ms, .. } => nav_err(format!("not {state} after {ms}ms")),
            other => other,
        })
    }

    async fn evaluate(&self, script: &str) -> ShopcheckResult<serde_json::Value> {
        self.eval_value(script).await
    }

    async fn current_url(&self) -> ShopcheckResult<String> {
        let value = self.eval_value("location.href").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn title(&self) -> ShopcheckResult<String> {
        let value = self.eval_value("document.title").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn mouse_move(&self, x: f64, y: f64) -> ShopcheckResult<()> {
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(page_err)?;
        self.page.execute(params).await.map_err(page_err)?;
        Ok(())
    }

    async fn set_viewport(&self, width: u32, height: u32) -> ShopcheckResult<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(width < MOBILE_MAX_WIDTH)
            .build()
            .map_err(page_err)?;
        self.page.execute(params).await.map_err(page_err)?;
        Ok(())
    }

    async fn arm_dialog(&self, action: DialogAction) -> ShopcheckResult<()> {
        self.dialogs.arm(action);
        Ok(())
    }

    fn dialogs(&self) -> Vec<DialogRecord> {
        self.dialogs.handled()
    }

    async fn route(&self, rule: RouteRule) -> ShopcheckResult<()> {
        let script = rule.install_script()?;
        self.page
            .evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(script.clone()))
            .await
            .map_err(page_err)?;
        self.eval_value(&script).await?;
        Ok(())
    }

    async fn cookies(&self) -> ShopcheckResult<Vec<Cookie>> {
        let cookies = self.page.get_cookies().await.map_err(page_err)?;
        Ok(cookies
            .into_iter()
            .map(|c| Cookie::new(c.name, c.value, c.domain))
            .collect())
    }

    async fn close(&self) -> ShopcheckResult<()> {
        self.dialog_listener.abort();
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ShopcheckError::BrowserLaunch {
                message: e.to_string(),
            })?;
        self.handler.abort();
        Ok(())
    }
}
