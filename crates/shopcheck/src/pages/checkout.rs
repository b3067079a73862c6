//! Order review page.

use super::PageArea;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// `/checkout`: delivery and billing blocks, order comment, "Place Order"
#[derive(Debug, Clone)]
pub struct Checkout {
    page: Page,
}

impl PageArea for Checkout {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/checkout")
    }
}

impl Checkout {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// "Your delivery address" block
    #[must_use]
    pub fn delivery_address(&self) -> Locator {
        self.page.locator("#address_delivery")
    }

    /// "Your billing address" block
    #[must_use]
    pub fn billing_address(&self) -> Locator {
        self.page.locator("#address_invoice")
    }

    /// Order comment textarea
    #[must_use]
    pub fn comment_input(&self) -> Locator {
        self.page.locator("textarea[name=\"message\"]")
    }

    /// "Place Order" button
    #[must_use]
    pub fn place_order_button(&self) -> Locator {
        self.page.locator("a").filter_has_text("Place Order")
    }

    /// Read-only fields rendered on the review table
    #[must_use]
    pub fn readonly_fields(&self) -> Locator {
        self.page.locator(".form-control[readonly]")
    }

    /// Leave an order comment and continue to payment
    pub async fn place_order(&self, comment: &str) -> ShopcheckResult<()> {
        self.comment_input().fill(comment).await?;
        self.place_order_button().click().await?;
        tracing::info!("order placed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::driver::MockDriver;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_place_order_comments_then_clicks() {
        let driver = MockDriver::new();
        let checkout = Checkout::new(Page::new(Arc::new(driver.clone()), SuiteConfig::default()));
        checkout.place_order("Leave at the door").await.unwrap();
        assert_eq!(
            driver.history_lines(),
            vec![
                "fill textarea[name=\"message\"] = Leave at the door",
                "click a >> has-text=\"Place Order\"",
            ]
        );
    }
}
