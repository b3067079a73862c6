//! Helpers shared by every page area.

use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::price::parse_price;
use crate::result::ShopcheckResult;

/// Scroll the window to a vertical offset
pub async fn scroll_to(page: &Page, y: i64) -> ShopcheckResult<()> {
    page.scroll_to(y).await
}

/// Resize the viewport
pub async fn resize_window(page: &Page, width: u32, height: u32) -> ShopcheckResult<()> {
    page.set_viewport_size(width, height).await
}

/// Read the first match's text and parse it as a price
pub async fn get_price_value(locator: &Locator) -> ShopcheckResult<f64> {
    let text = locator.inner_text().await?;
    let value = parse_price(&text)?;
    tracing::debug!(locator = %locator, %text, value, "price");
    Ok(value)
}

/// Fail with `AssertionFailed` unless the container's text includes `line`
pub async fn verify_address_details(container: &Locator, line: &str) -> ShopcheckResult<()> {
    expect(container).to_contain_text(line).await
}
