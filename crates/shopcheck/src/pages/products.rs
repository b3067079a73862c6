//! Product listing: search, sidebar filters, cards, recommended items.
//!
//! Card indices are 0-based everywhere.

use super::PageArea;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// Home page grid and `/products`
#[derive(Debug, Clone)]
pub struct Products {
    page: Page,
}

impl PageArea for Products {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/products")
    }
}

impl Products {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // =========================================================================
    // Search & titles
    // =========================================================================

    /// Search box on the products page
    #[must_use]
    pub fn search_input(&self) -> Locator {
        self.page.locator("#search_product")
    }

    /// Search submit button
    #[must_use]
    pub fn search_button(&self) -> Locator {
        self.page.locator("#submit_search")
    }

    /// Listing heading ("All Products", "Brand - Polo Products", ...)
    #[must_use]
    pub fn title_heading(&self) -> Locator {
        self.page.locator("h2.title")
    }

    /// Product grid container
    #[must_use]
    pub fn features_items(&self) -> Locator {
        self.page.locator(".features_items")
    }

    /// Product name on the details page
    #[must_use]
    pub fn product_info_heading(&self) -> Locator {
        self.page.locator(".product-information h2")
    }

    // =========================================================================
    // Sidebar
    // =========================================================================

    /// Category accordion toggle (`Women`, `Men`, `Kids`)
    #[must_use]
    pub fn category_link(&self, category: &str) -> Locator {
        self.page
            .locator(format!(".panel-title a[href=\"#{category}\"]"))
    }

    /// Subcategory link by category id (1 = Women > Dress, 3 = Men > Tshirts)
    #[must_use]
    pub fn subcategory_link(&self, category_id: u32) -> Locator {
        self.page
            .locator(format!("a[href=\"/category_products/{category_id}\"]"))
    }

    /// Sidebar brand link for `brand`
    #[must_use]
    pub fn brand_link(&self, brand: &str) -> Locator {
        self.page
            .locator(format!(".brands-name a[href=\"/brand_products/{brand}\"]"))
    }

    /// "Women" toggle in the category sidebar
    #[must_use]
    pub fn women_panel(&self) -> Locator {
        self.page.locator("#accordian a[href=\"#Women\"]")
    }

    /// "Dress" link under the Women category
    #[must_use]
    pub fn dress_link(&self) -> Locator {
        self.subcategory_link(1)
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// The `index`th product card in the grid
    #[must_use]
    pub fn product_card(&self, index: usize) -> Locator {
        self.page.locator(".single-products").nth(index)
    }

    /// Hover overlay of a card; collapsed to zero height until hovered
    #[must_use]
    pub fn product_overlay(&self, index: usize) -> Locator {
        self.product_card(index).locator(".product-overlay")
    }

    /// Every card wrapper in the grid
    #[must_use]
    pub fn product_wrappers(&self) -> Locator {
        self.page.locator(".product-image-wrapper")
    }

    /// Price of the first card in the grid
    #[must_use]
    pub fn first_list_price(&self) -> Locator {
        self.page.locator(".productinfo h2").first()
    }

    /// Name of the first card in the grid
    #[must_use]
    pub fn first_list_name(&self) -> Locator {
        self.page.locator(".productinfo p").first()
    }

    /// Always-visible "Add to cart" of the first card
    #[must_use]
    pub fn add_to_cart_first(&self) -> Locator {
        self.page.locator(".add-to-cart").first()
    }

    /// Overlay "Add to cart" of the first card (needs a hover)
    #[must_use]
    pub fn overlay_add_to_cart_first(&self) -> Locator {
        self.page.locator(".overlay-content .add-to-cart").first()
    }

    /// "Add to cart" button of the card for `product_id`
    #[must_use]
    pub fn add_to_cart_by_id(&self, product_id: u64) -> Locator {
        self.page
            .locator(format!("a[data-product-id=\"{product_id}\"]"))
            .first()
    }

    /// "View Product" link of the `index`th card
    #[must_use]
    pub fn view_product_link(&self, index: usize) -> Locator {
        self.page.locator(".choose a").nth(index)
    }

    // =========================================================================
    // Recommended items
    // =========================================================================

    /// "Recommended items" carousel at the foot of the home page
    #[must_use]
    pub fn recommended_carousel(&self) -> Locator {
        self.page.locator("#recommended-item-carousel")
    }

    /// First "Add to cart" in the visible carousel slide
    #[must_use]
    pub fn recommended_add_button(&self) -> Locator {
        self.page
            .locator(".recommended_items .active .add-to-cart")
            .first()
    }

    // =========================================================================
    // Composite actions
    // =========================================================================

    /// Search the catalogue for `name`
    pub async fn search_product(&self, name: &str) -> ShopcheckResult<()> {
        tracing::info!(%name, "search");
        self.search_input().fill(name).await?;
        self.search_button().click().await
    }

    /// Hover a card and use its overlay "Add to cart"
    pub async fn add_to_cart_by_hover(&self, index: usize) -> ShopcheckResult<()> {
        let card = self.product_card(index);
        card.hover().await?;
        card.locator(".overlay-content .add-to-cart").click().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::driver::{DriverCall, MockDriver};
    use std::sync::Arc;

    fn products_with(driver: &MockDriver) -> Products {
        Products::new(Page::new(Arc::new(driver.clone()), SuiteConfig::default()))
    }

    #[test]
    fn test_selectors() {
        let products = products_with(&MockDriver::new());
        assert_eq!(
            products.brand_link("Polo").to_string(),
            ".brands-name a[href=\"/brand_products/Polo\"]"
        );
        assert_eq!(products.view_product_link(2).to_string(), ".choose a >> nth=2");
        assert_eq!(
            products.add_to_cart_by_id(2).to_string(),
            "a[data-product-id=\"2\"] >> nth=0"
        );
        assert_eq!(
            products.product_overlay(0).to_string(),
            ".single-products >> nth=0 >> .product-overlay"
        );
    }

    #[tokio::test]
    async fn test_search_product() {
        let driver = MockDriver::new();
        products_with(&driver).search_product("Blue Top").await.unwrap();
        assert_eq!(
            driver.history_lines(),
            vec!["fill #search_product = Blue Top", "click #submit_search"]
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_by_hover_moves_pointer_before_click() {
        let driver = MockDriver::new();
        products_with(&driver).add_to_cart_by_hover(1).await.unwrap();
        let history = driver.history();
        assert!(matches!(history[1], DriverCall::MouseMove { .. }));
        assert_eq!(
            history[2].to_string(),
            "click .single-products >> nth=1 >> .overlay-content .add-to-cart"
        );
    }
}
