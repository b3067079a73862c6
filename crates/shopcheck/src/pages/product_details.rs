//! Product details page and its review form.

use super::PageArea;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// `/product_details/:id`
#[derive(Debug, Clone)]
pub struct ProductDetails {
    page: Page,
}

impl PageArea for ProductDetails {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/product_details/:id")
    }
}

impl ProductDetails {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Price tag ("Rs. 500") in the product information panel
    #[must_use]
    pub fn price(&self) -> Locator {
        self.page.locator(".product-information span span").first()
    }

    /// "Availability:" line of the product information panel
    #[must_use]
    pub fn availability(&self) -> Locator {
        self.page
            .locator(".product-information p")
            .filter_has_text("Availability:")
    }

    /// Quantity spinner next to the price
    #[must_use]
    pub fn quantity_input(&self) -> Locator {
        self.page.locator("#quantity")
    }

    /// "Add to cart" button
    #[must_use]
    pub fn add_to_cart_button(&self) -> Locator {
        self.page.locator("button.cart")
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// "Write Your Review" form
    #[must_use]
    pub fn review_form(&self) -> Locator {
        self.page.locator("#review-form")
    }

    /// Review tab area, including its success notice
    #[must_use]
    pub fn review_section(&self) -> Locator {
        self.page.locator("#review-section")
    }

    /// Reviewer name
    #[must_use]
    pub fn review_name_input(&self) -> Locator {
        self.page.locator("#name")
    }

    /// Reviewer email
    #[must_use]
    pub fn review_email_input(&self) -> Locator {
        self.page.locator("#email")
    }

    /// Review body
    #[must_use]
    pub fn review_text_input(&self) -> Locator {
        self.page.locator("#review")
    }

    /// Review submit button
    #[must_use]
    pub fn submit_review_button(&self) -> Locator {
        self.page.locator("#button-review")
    }

    /// "Thank you for your review." banner
    #[must_use]
    pub fn review_success(&self) -> Locator {
        self.page.locator("#review-section .alert-success")
    }

    /// Fill in and submit the review form
    pub async fn submit_review(&self, name: &str, email: &str, review: &str) -> ShopcheckResult<()> {
        self.review_name_input().fill(name).await?;
        self.review_email_input().fill(email).await?;
        self.review_text_input().fill(review).await?;
        self.submit_review_button().click().await
    }

    /// Set the quantity field and add to cart
    pub async fn add_quantity_to_cart(&self, quantity: u32) -> ShopcheckResult<()> {
        self.quantity_input().fill(&quantity.to_string()).await?;
        self.add_to_cart_button().click().await
    }
}
