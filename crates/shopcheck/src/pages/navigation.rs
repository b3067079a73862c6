//! Header, global overlays and hard navigation.

use super::PageArea;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;
use crate::wait::{optional, LoadState, WaitState};
use std::time::Duration;

/// Site-wide chrome: logo, nav links, consent dialog, "added to cart" modal
#[derive(Debug, Clone)]
pub struct Navigation {
    page: Page,
}

impl PageArea for Navigation {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/")
    }
}

impl Navigation {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // =========================================================================
    // Global UI
    // =========================================================================

    /// Site logo
    #[must_use]
    pub fn logo(&self) -> Locator {
        self.page.locator(".logo")
    }

    /// "Consent" button of the privacy overlay
    #[must_use]
    pub fn consent_button(&self) -> Locator {
        self.page.get_by_role("button", None).filter_has_text("Consent")
    }

    // =========================================================================
    // "Added to cart" modal
    // =========================================================================

    /// "Added!" modal shown after adding to cart
    #[must_use]
    pub fn cart_modal(&self) -> Locator {
        self.page.locator("#cartModal")
    }

    /// "Continue Shopping" button of the cart modal
    #[must_use]
    pub fn continue_shopping_button(&self) -> Locator {
        self.page.locator(".close-modal")
    }

    /// "View Cart" link of the cart modal
    #[must_use]
    pub fn view_cart_link(&self) -> Locator {
        self.page.locator("u").filter_has_text("View Cart")
    }

    /// Body of whichever modal is open
    #[must_use]
    pub fn modal_body(&self) -> Locator {
        self.page.locator(".modal-body")
    }

    // =========================================================================
    // Header links
    // =========================================================================

    /// Header "Home" link
    #[must_use]
    pub fn home_link(&self) -> Locator {
        self.page.locator("a[href=\"/\"]")
    }

    /// Header "Signup / Login" link
    #[must_use]
    pub fn login_link(&self) -> Locator {
        self.page.locator("a[href=\"/login\"]")
    }

    /// Header "Products" link
    #[must_use]
    pub fn products_link(&self) -> Locator {
        self.page.locator("li a[href=\"/products\"]")
    }

    /// Cart link in the header (the footer has another)
    #[must_use]
    pub fn cart_link(&self) -> Locator {
        self.page.locator("header a[href=\"/view_cart\"]")
    }

    /// Header "Contact us" link
    #[must_use]
    pub fn contact_link(&self) -> Locator {
        self.page.locator("a[href=\"/contact_us\"]")
    }

    /// Header "Logout" link, present only when logged in
    #[must_use]
    pub fn logout_link(&self) -> Locator {
        self.page.locator("a[href=\"/logout\"]")
    }

    /// Header "Delete Account" link, present only when logged in
    #[must_use]
    pub fn delete_account_link(&self) -> Locator {
        self.page.locator("a[href=\"/delete_account\"]")
    }

    /// Header "API Testing" link
    #[must_use]
    pub fn api_testing_link(&self) -> Locator {
        self.page.locator("a").filter_has_text("API Testing")
    }

    // =========================================================================
    // User status
    // =========================================================================

    /// "Logged in as" banner, whoever is logged in
    #[must_use]
    pub fn logged_in_text(&self) -> Locator {
        self.page.get_by_text("Logged in as")
    }

    /// "Logged in as <user>" banner
    #[must_use]
    pub fn logged_in_as(&self, user: &str) -> Locator {
        self.page.get_by_text(format!("Logged in as {user}"))
    }

    // =========================================================================
    // Hard navigation
    // =========================================================================

    /// Open the home page directly
    pub async fn go_to_home_page(&self) -> ShopcheckResult<()> {
        self.page.goto_with("/", LoadState::DomContentLoaded).await
    }

    /// Open the login page directly
    pub async fn go_to_login_page(&self) -> ShopcheckResult<()> {
        self.page.goto_with("/login", LoadState::DomContentLoaded).await
    }

    /// Open `/product_details/{product_id}`
    pub async fn go_to_product_details(&self, product_id: u64) -> ShopcheckResult<()> {
        self.page
            .goto_with(
                &format!("/product_details/{product_id}"),
                LoadState::DomContentLoaded,
            )
            .await
    }

    /// Current URL
    pub async fn page_url(&self) -> ShopcheckResult<String> {
        self.page.url().await
    }

    /// Current document title
    pub async fn page_title(&self) -> ShopcheckResult<String> {
        self.page.title().await
    }

    // =========================================================================
    // Composite actions
    // =========================================================================

    /// Click the consent button if it shows up within `timeout`.
    ///
    /// Returns whether it was there. Absence is not an error.
    pub async fn dismiss_consent(&self, timeout: Duration) -> ShopcheckResult<bool> {
        let button = self.consent_button();
        let shown = optional(
            "consent dialog",
            button.wait_for(WaitState::Visible, timeout),
        )
        .await?;
        if shown {
            button.click().await?;
            tracing::info!("consent dialog dismissed");
        }
        Ok(shown)
    }

    /// Log out through the header link
    pub async fn logout(&self) -> ShopcheckResult<()> {
        self.logout_link().click().await
    }
}
