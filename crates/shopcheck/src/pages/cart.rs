//! Shopping cart page and the scraped view of its rows.

use super::PageArea;
use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::price::parse_price;
use crate::result::ShopcheckResult;
use serde::Serialize;

/// One rendered cart row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    /// Product name
    pub name: String,
    /// Category line, e.g. `Women > Tops`
    pub category: String,
    /// Unit price
    pub unit_price: f64,
    /// Quantity
    pub quantity: u32,
    /// Row total as rendered
    pub line_total: f64,
}

impl CartItem {
    /// Unit price times quantity
    #[must_use]
    pub fn expected_line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Rendered total agrees with unit price times quantity
    #[must_use]
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        (self.line_total - self.expected_line_total()).abs() <= tolerance
    }
}

/// Every row of the cart at one moment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSummary {
    /// Rows in page order
    pub items: Vec<CartItem>,
}

impl CartSummary {
    /// Sum of rendered row totals
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(|i| i.line_total).sum()
    }

    /// Sum of unit prices times quantities
    #[must_use]
    pub fn expected_total(&self) -> f64 {
        self.items.iter().map(CartItem::expected_line_total).sum()
    }

    /// Every row is internally consistent
    #[must_use]
    pub fn line_totals_consistent(&self, tolerance: f64) -> bool {
        self.items.iter().all(|i| i.is_consistent(tolerance))
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No lines at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First row whose name contains `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.name.contains(name))
    }
}

/// `/view_cart` and its checkout modal
#[derive(Debug, Clone)]
pub struct Cart {
    page: Page,
}

impl PageArea for Cart {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/view_cart")
    }
}

impl Cart {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // =========================================================================
    // Actions & messages
    // =========================================================================

    /// Delete cross of the first cart row
    #[must_use]
    pub fn remove_first_button(&self) -> Locator {
        self.remove_buttons().first()
    }

    /// Delete crosses of every cart row
    #[must_use]
    pub fn remove_buttons(&self) -> Locator {
        self.page.locator(".cart_quantity_delete")
    }

    /// "Cart is empty!" banner; hidden while the cart has rows
    #[must_use]
    pub fn empty_message(&self) -> Locator {
        self.page.locator("#empty_cart")
    }

    /// "Proceed To Checkout" button
    #[must_use]
    pub fn proceed_to_checkout_button(&self) -> Locator {
        self.page.locator(".check_out")
    }

    // =========================================================================
    // Table
    // =========================================================================

    /// Body of the cart table
    #[must_use]
    pub fn table_body(&self) -> Locator {
        self.page.locator("#cart_info_table tbody")
    }

    /// One row per cart line
    #[must_use]
    pub fn rows(&self) -> Locator {
        self.page.locator("#cart_info_table tbody tr")
    }

    /// Read-only quantity cell of row `index`
    #[must_use]
    pub fn quantity_button(&self, index: usize) -> Locator {
        self.page.locator("button.disabled").nth(index)
    }

    /// Quantity input of the `index`th row, where the cart renders one
    #[must_use]
    pub fn quantity_input(&self, index: usize) -> Locator {
        self.page.locator("input.cart_quantity_input").nth(index)
    }

    /// Line-total price cells
    #[must_use]
    pub fn total_prices(&self) -> Locator {
        self.page.locator("#cart_info_table .cart_total_price")
    }

    /// Unit price cells
    #[must_use]
    pub fn unit_prices(&self) -> Locator {
        self.page.locator("#cart_info_table .cart_price")
    }

    /// Line-total columns
    #[must_use]
    pub fn line_totals(&self) -> Locator {
        self.page.locator("#cart_info td.cart_total")
    }

    /// Row of a product by its catalogue id
    #[must_use]
    pub fn item(&self, product_id: u64) -> Locator {
        self.page.locator(format!("#product-{product_id}"))
    }

    /// Product name inside the row for `product_id`
    #[must_use]
    pub fn item_name(&self, product_id: u64) -> Locator {
        self.item(product_id).locator("h4")
    }

    // =========================================================================
    // Guest checkout modal
    // =========================================================================

    /// Guest checkout modal
    #[must_use]
    pub fn checkout_modal(&self) -> Locator {
        self.page.locator("#checkoutModal")
    }

    /// "Register / Login" link inside the guest checkout modal
    #[must_use]
    pub fn checkout_modal_login_link(&self) -> Locator {
        self.page.locator("#checkoutModal u")
    }

    /// Prompt text of the guest checkout modal
    #[must_use]
    pub fn checkout_modal_message(&self) -> Locator {
        self.page
            .locator("p")
            .filter_has_text("Register / Login account to proceed on checkout.")
    }

    // =========================================================================
    // Composite actions
    // =========================================================================

    /// Scrape every row into a [`CartSummary`]
    pub async fn items(&self) -> ShopcheckResult<CartSummary> {
        let mut items = Vec::new();
        for row in self.rows().all().await? {
            let name = row.locator(".cart_description h4").inner_text().await?;
            let category = row.locator(".cart_description p").inner_text().await?;
            let unit_price = parse_price(&row.locator(".cart_price").inner_text().await?)?;
            let quantity = parse_price(&row.locator(".cart_quantity").inner_text().await?)?;
            let line_total = parse_price(&row.locator(".cart_total_price").inner_text().await?)?;
            items.push(CartItem {
                name: name.trim().to_string(),
                category: category.trim().to_string(),
                unit_price,
                quantity: quantity as u32,
                line_total,
            });
        }
        tracing::debug!(rows = items.len(), "cart scraped");
        Ok(CartSummary { items })
    }

    /// Remove rows one at a time until none are left; returns how many went
    pub async fn clear(&self) -> ShopcheckResult<usize> {
        let mut removed = 0;
        loop {
            let remaining = self.remove_buttons().count().await?;
            if remaining == 0 {
                break;
            }
            self.remove_first_button().click().await?;
            expect(&self.remove_buttons())
                .to_have_count(remaining - 1)
                .await?;
            removed += 1;
        }
        tracing::info!(removed, "cart cleared");
        Ok(removed)
    }
}
