//! Per-test storefront fixture and composable setup/teardown hooks.
//!
//! [`StorefrontFixture`] gives every test its own browser on the home page with
//! the consent overlay out of the way. Extra per-test resources (a logged-in
//! session, seeded cart) are expressed as [`Fixture`]s and registered on it;
//! they are set up in priority order and torn down in reverse before the
//! browser closes.

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::expect::expect;
use crate::page::Page;
use crate::pages::PageManager;
use crate::result::{ShopcheckError, ShopcheckResult};
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A resource set up against the storefront before a test and removed after.
#[async_trait]
pub trait Fixture: Any + Send + Sync {
    /// Set up the fixture before test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture setup fails.
    async fn setup(&mut self, pm: &PageManager) -> ShopcheckResult<()>;

    /// Tear down the fixture after test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture teardown fails.
    async fn teardown(&mut self, pm: &PageManager) -> ShopcheckResult<()>;

    /// Get the fixture name for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Get fixture priority (higher = set up first, tear down last).
    fn priority(&self) -> i32 {
        0
    }
}

/// State of a fixture in the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Fixture is registered but not set up.
    Registered,
    /// Fixture has been set up successfully.
    SetUp,
    /// Fixture has been torn down.
    TornDown,
    /// Fixture setup or teardown failed.
    Failed,
}

struct FixtureEntry {
    type_id: TypeId,
    fixture: Box<dyn Fixture>,
    state: FixtureState,
    priority: i32,
}

/// Priority-ordered setup, reverse-order teardown.
#[derive(Default)]
pub struct FixtureManager {
    entries: Vec<FixtureEntry>,
    setup_order: Vec<TypeId>,
}

impl std::fmt::Debug for FixtureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureManager")
            .field("fixture_count", &self.entries.len())
            .field("setup_order", &self.setup_order.len())
            .finish()
    }
}

impl FixtureManager {
    /// Create a new fixture manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture, replacing any earlier one of the same type.
    pub fn register<F: Fixture + 'static>(&mut self, fixture: F) {
        let type_id = TypeId::of::<F>();
        let priority = fixture.priority();
        self.entries.retain(|e| e.type_id != type_id);
        self.setup_order.retain(|id| *id != type_id);
        self.entries.push(FixtureEntry {
            type_id,
            fixture: Box::new(fixture),
            state: FixtureState::Registered,
            priority,
        });
    }

    #[must_use]
    pub fn is_registered<F: Fixture + 'static>(&self) -> bool {
        let type_id = TypeId::of::<F>();
        self.entries.iter().any(|e| e.type_id == type_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn state<F: Fixture + 'static>(&self) -> Option<FixtureState> {
        let type_id = TypeId::of::<F>();
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .map(|e| e.state)
    }

    /// Names of registered fixtures, highest priority first
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        let mut entries: Vec<&FixtureEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries.iter().map(|e| e.fixture.name()).collect()
    }

    /// Set up every pending fixture in priority order (highest first).
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture setup fails. Previously set up
    /// fixtures are torn down before returning the error.
    pub async fn setup_all(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
        // Stable sort keeps registration order among equal priorities
        self.entries.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut failure: Option<String> = None;
        for entry in &mut self.entries {
            if !matches!(entry.state, FixtureState::Registered | FixtureState::TornDown) {
                continue;
            }
            tracing::debug!(fixture = entry.fixture.name(), "setup");
            if let Err(e) = entry.fixture.setup(pm).await {
                entry.state = FixtureState::Failed;
                failure = Some(format!(
                    "Fixture '{}' setup failed: {e}",
                    entry.fixture.name()
                ));
                break;
            }
            entry.state = FixtureState::SetUp;
            self.setup_order.push(entry.type_id);
        }

        if let Some(message) = failure {
            // The setup error wins over any rollback error
            let _ = self.teardown_all(pm).await;
            return Err(ShopcheckError::Fixture { message });
        }
        Ok(())
    }

    /// Tear down fixtures in reverse setup order.
    ///
    /// # Errors
    ///
    /// Returns the first teardown error. Every other fixture is still
    /// torn down.
    pub async fn teardown_all(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
        let mut first_error: Option<ShopcheckError> = None;

        for type_id in self.setup_order.iter().rev() {
            let Some(entry) = self.entries.iter_mut().find(|e| e.type_id == *type_id) else {
                continue;
            };
            if entry.state != FixtureState::SetUp {
                continue;
            }
            tracing::debug!(fixture = entry.fixture.name(), "teardown");
            match entry.fixture.teardown(pm).await {
                Ok(()) => entry.state = FixtureState::TornDown,
                Err(e) => {
                    tracing::warn!(fixture = entry.fixture.name(), error = %e, "teardown failed");
                    if first_error.is_none() {
                        first_error = Some(ShopcheckError::Fixture {
                            message: format!(
                                "Fixture '{}' teardown failed: {e}",
                                entry.fixture.name()
                            ),
                        });
                    }
                    entry.state = FixtureState::Failed;
                }
            }
        }
        self.setup_order.clear();

        first_error.map_or(Ok(()), Err)
    }
}

/// Logs the pre-registered account in on setup and out on teardown
#[derive(Debug, Clone)]
pub struct LoginFixture {
    email: String,
    password: String,
}

impl LoginFixture {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The account every [`PageManager`] carries as `credentials`
    #[must_use]
    pub fn registered() -> Self {
        let user = crate::data::registered_user();
        Self::new(user.email, user.password)
    }
}

#[async_trait]
impl Fixture for LoginFixture {
    async fn setup(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
        pm.nav.login_link().click().await?;
        pm.auth.login_user(&self.email, &self.password).await?;
        expect(&pm.nav.logged_in_text()).to_be_visible().await
    }

    async fn teardown(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
        pm.nav.logout().await
    }

    fn name(&self) -> &str {
        "login"
    }

    fn priority(&self) -> i32 {
        10
    }
}

/// A fresh browser on the storefront home page, ready for one test
#[derive(Debug)]
pub struct StorefrontFixture {
    driver: Arc<dyn Driver>,
    pm: PageManager,
    fixtures: FixtureManager,
}

impl StorefrontFixture {
    /// Launch Chromium, open the home page and dismiss the consent overlay
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot start or the home page does not load
    #[cfg(feature = "browser")]
    pub async fn setup(config: &SuiteConfig) -> ShopcheckResult<Self> {
        let driver = crate::browser::ChromiumDriver::launch(&config.browser).await?;
        Self::from_driver(Arc::new(driver), config.clone()).await
    }

    /// Same as [`setup`](Self::setup) over an already running driver
    ///
    /// # Errors
    ///
    /// Returns error if the home page does not load
    pub async fn from_driver(driver: Arc<dyn Driver>, config: SuiteConfig) -> ShopcheckResult<Self> {
        let consent_timeout = config.consent_timeout();
        let page = Page::new(Arc::clone(&driver), config);
        let pm = PageManager::new(page);
        pm.nav.go_to_home_page().await?;
        let dismissed = pm.nav.dismiss_consent(consent_timeout).await?;
        tracing::info!(consent_dismissed = dismissed, "storefront ready");
        Ok(Self {
            driver,
            pm,
            fixtures: FixtureManager::new(),
        })
    }

    /// The page-area facade
    #[must_use]
    pub const fn pm(&self) -> &PageManager {
        &self.pm
    }

    /// Register `fixture` and set it up right away
    ///
    /// # Errors
    ///
    /// Returns the setup error; nothing registered so far stays set up
    pub async fn with_fixture<F: Fixture + 'static>(&mut self, fixture: F) -> ShopcheckResult<()> {
        self.fixtures.register(fixture);
        self.fixtures.setup_all(&self.pm).await
    }

    #[must_use]
    pub const fn fixtures(&self) -> &FixtureManager {
        &self.fixtures
    }

    /// Tear down registered fixtures, then close the browser.
    ///
    /// # Errors
    ///
    /// Returns the first fixture error, or the close error if all fixtures
    /// came down cleanly. The browser is closed either way.
    pub async fn teardown(mut self) -> ShopcheckResult<()> {
        let fixtures = self.fixtures.teardown_all(&self.pm).await;
        let closed = self.driver.close().await;
        tracing::info!("storefront closed");
        fixtures.and(closed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{DriverCall, MockDriver};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        priority: i32,
        fail_setup: bool,
        fail_teardown: bool,
        log: Log,
    }

    impl Recorder {
        fn new(label: &'static str, priority: i32, log: &Log) -> Self {
            Self {
                label,
                priority,
                fail_setup: false,
                fail_teardown: false,
                log: Arc::clone(log),
            }
        }
    }

    #[async_trait]
    impl Fixture for Recorder {
        async fn setup(&mut self, _pm: &PageManager) -> ShopcheckResult<()> {
            self.log.lock().unwrap().push(format!("setup {}", self.label));
            if self.fail_setup {
                return Err(ShopcheckError::assertion("boom"));
            }
            Ok(())
        }

        async fn teardown(&mut self, _pm: &PageManager) -> ShopcheckResult<()> {
            self.log.lock().unwrap().push(format!("teardown {}", self.label));
            if self.fail_teardown {
                return Err(ShopcheckError::assertion("stuck"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            self.label
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    // Distinct types so the manager keeps them apart
    struct First(Recorder);
    struct Second(Recorder);

    macro_rules! delegate {
        ($t:ty) => {
            #[async_trait]
            impl Fixture for $t {
                async fn setup(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
                    self.0.setup(pm).await
                }
                async fn teardown(&mut self, pm: &PageManager) -> ShopcheckResult<()> {
                    self.0.teardown(pm).await
                }
                fn name(&self) -> &str {
                    self.0.name()
                }
                fn priority(&self) -> i32 {
                    self.0.priority()
                }
            }
        };
    }
    delegate!(First);
    delegate!(Second);

    fn pm_with(driver: &MockDriver) -> PageManager {
        PageManager::new(Page::new(
            Arc::new(driver.clone()),
            SuiteConfig::default().with_expect_timeout_ms(100),
        ))
    }

    mod manager_tests {
        use super::*;

        #[tokio::test]
        async fn test_setup_by_priority_teardown_reversed() {
            let log: Log = Arc::default();
            let pm = pm_with(&MockDriver::new());
            let mut manager = FixtureManager::new();
            manager.register(First(Recorder::new("low", 1, &log)));
            manager.register(Second(Recorder::new("high", 5, &log)));
            assert_eq!(manager.list(), vec!["high", "low"]);

            manager.setup_all(&pm).await.unwrap();
            assert_eq!(manager.state::<First>(), Some(FixtureState::SetUp));
            manager.teardown_all(&pm).await.unwrap();
            assert_eq!(manager.state::<Second>(), Some(FixtureState::TornDown));

            assert_eq!(
                *log.lock().unwrap(),
                vec!["setup high", "setup low", "teardown low", "teardown high"]
            );
        }

        #[tokio::test]
        async fn test_failed_setup_rolls_back() {
            let log: Log = Arc::default();
            let pm = pm_with(&MockDriver::new());
            let mut manager = FixtureManager::new();
            manager.register(Second(Recorder::new("high", 5, &log)));
            let mut bad = Recorder::new("low", 1, &log);
            bad.fail_setup = true;
            manager.register(First(bad));

            let err = manager.setup_all(&pm).await.unwrap_err();
            assert!(matches!(err, ShopcheckError::Fixture { .. }));
            assert!(err.to_string().contains("'low' setup failed"));
            assert_eq!(manager.state::<First>(), Some(FixtureState::Failed));
            assert_eq!(
                *log.lock().unwrap(),
                vec!["setup high", "setup low", "teardown high"]
            );
        }

        #[tokio::test]
        async fn test_teardown_continues_past_errors() {
            let log: Log = Arc::default();
            let pm = pm_with(&MockDriver::new());
            let mut manager = FixtureManager::new();
            let mut stuck = Recorder::new("high", 5, &log);
            stuck.fail_teardown = true;
            manager.register(Second(stuck));
            manager.register(First(Recorder::new("low", 1, &log)));
            manager.setup_all(&pm).await.unwrap();

            let err = manager.teardown_all(&pm).await.unwrap_err();
            assert!(err.to_string().contains("'high' teardown failed"));
            assert_eq!(manager.state::<First>(), Some(FixtureState::TornDown));
            assert_eq!(manager.state::<Second>(), Some(FixtureState::Failed));
        }

        #[tokio::test]
        async fn test_register_replaces_same_type() {
            let log: Log = Arc::default();
            let mut manager = FixtureManager::new();
            manager.register(First(Recorder::new("a", 0, &log)));
            manager.register(First(Recorder::new("b", 0, &log)));
            assert_eq!(manager.count(), 1);
            assert!(manager.is_registered::<First>());
            assert!(!manager.is_registered::<Second>());
            assert_eq!(manager.list(), vec!["b"]);
        }
    }

    mod storefront_tests {
        use super::*;
        use crate::pages::PageArea;

        #[tokio::test]
        async fn test_from_driver_opens_home_and_dismisses_consent() {
            let driver = MockDriver::new();
            let fixture = StorefrontFixture::from_driver(
                Arc::new(driver.clone()),
                SuiteConfig::default().with_consent_timeout_ms(50),
            )
            .await
            .unwrap();
            let history = driver.history();
            assert!(matches!(&history[0], DriverCall::Goto { url, .. } if url == "https://automationexercise.com/"));
            assert_eq!(
                history.last().unwrap().to_string(),
                "click role=button >> has-text=\"Consent\""
            );
            assert!(fixture.pm().nav.is_current().await.unwrap());
        }

        #[tokio::test]
        async fn test_missing_consent_is_not_an_error() {
            let driver = MockDriver::new().with_responder(|tag| {
                (tag.op == "probe")
                    .then(|| MockDriver::ok(serde_json::json!({ "count": 0, "visible": false })))
            });
            let fixture = StorefrontFixture::from_driver(
                Arc::new(driver.clone()),
                SuiteConfig::default().with_consent_timeout_ms(30),
            )
            .await
            .unwrap();
            fixture.teardown().await.unwrap();
            assert_eq!(driver.history().last(), Some(&DriverCall::Close));
        }

        #[tokio::test]
        async fn test_login_fixture_logs_in_and_out() {
            let driver = MockDriver::new().with_responder(|tag| {
                (tag.op == "snapshot")
                    .then(|| MockDriver::ok(serde_json::json!({ "count": 1, "visible": true })))
            });
            let mut fixture = StorefrontFixture::from_driver(
                Arc::new(driver.clone()),
                SuiteConfig::default().with_consent_timeout_ms(30),
            )
            .await
            .unwrap();
            driver.clear_history();

            fixture.with_fixture(LoginFixture::registered()).await.unwrap();
            assert_eq!(fixture.fixtures().state::<LoginFixture>(), Some(FixtureState::SetUp));
            assert!(driver
                .history_lines()
                .contains(&"fill [data-qa=\"login-email\"] = johndoeseventh@johndoe.com".to_string()));

            fixture.teardown().await.unwrap();
            let lines = driver.history_lines();
            assert_eq!(lines[lines.len() - 2], "click a[href=\"/logout\"]");
            assert_eq!(lines[lines.len() - 1], "close");
        }
    }
}
