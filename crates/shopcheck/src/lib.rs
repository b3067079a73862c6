//! Shopcheck: page-object end-to-end suite for the Automation Exercise storefront
//!
//! The library drives a real Chromium over CDP behind a small [`Driver`]
//! seam. Locators are lazy descriptions resolved in the page on every action;
//! expectations retry until they hold or their bound elapses. Page areas wrap
//! the storefront's selectors and are bundled by [`PageManager`]; the
//! [`StorefrontFixture`] hands a ready one to every test.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Scenario     │   │ PageManager  │   │ Locator /    │   │ Driver       │
//! │ (tests/*.rs) │──►│ (page areas) │──►│ expect       │──►│ (CDP / mock) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Live scenarios need the `browser` feature and a Chromium install. Everything
//! else, including every page area, runs against [`MockDriver`].

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Chromium over CDP (needs the `browser` feature)
#[cfg(feature = "browser")]
pub mod browser;

pub mod config;
pub mod data;
pub mod dialog;
pub mod driver;
pub mod expect;
pub mod fixture;
pub mod locator;
pub mod network;
pub mod page;
pub mod pages;
pub mod price;
pub mod result;
pub mod state;
pub mod telemetry;
pub mod upload;
pub mod wait;

pub use config::{BrowserConfig, SuiteConfig};
pub use driver::{Driver, MockDriver};
pub use expect::{assert_close, expect, expect_page};
pub use fixture::{Fixture, FixtureManager, LoginFixture, StorefrontFixture};
pub use locator::Locator;
pub use page::Page;
pub use pages::{PageArea, PageManager};
pub use result::{ShopcheckError, ShopcheckResult};

/// Everything a scenario usually needs
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::browser::ChromiumDriver;
    pub use super::config::{BrowserConfig, SuiteConfig};
    pub use super::data::{
        default_account, default_address, empty_payments, invalid_payments, registered_user,
        valid_payment, AccountDetails, AddressDetails, ContactMessage, Gender, PaymentDetails,
        RegisteredUser, EXISTING_SIGNUP_EMAIL,
    };
    pub use super::dialog::{DialogAction, DialogRecord, DialogType};
    pub use super::driver::{Cookie, Driver, MockDriver};
    pub use super::expect::{assert_close, expect, expect_page};
    pub use super::fixture::{Fixture, FixtureManager, LoginFixture, StorefrontFixture};
    pub use super::locator::Locator;
    pub use super::network::{HttpMethod, PayloadRewrite, RouteRule, UrlPattern};
    pub use super::page::{Page, SessionResponse};
    pub use super::pages::{
        Auth, Cart, CartItem, CartSummary, Checkout, Navigation, PageArea, PageManager, Payment,
        ProductDetails, Products, Support, UrlMatcher,
    };
    pub use super::price::{format_rupees, parse_price};
    pub use super::result::{ShopcheckError, ShopcheckResult};
    pub use super::state::{InitMode, SharedState};
    pub use super::telemetry::init_tracing;
    pub use super::upload::FilePayload;
    pub use super::wait::{LoadState, WaitOptions, WaitState};
}
