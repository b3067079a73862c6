//! Shared setup for the live suites.

#![allow(dead_code)]

use shopcheck::prelude::*;

/// Tracing on, configuration from the environment, browser on the home page
pub async fn storefront() -> ShopcheckResult<StorefrontFixture> {
    init_tracing();
    let config = SuiteConfig::from_env()?;
    StorefrontFixture::setup(&config).await
}

/// The identity written by `shopcheck setup`
pub fn shared_state() -> ShopcheckResult<SharedState> {
    let config = SuiteConfig::from_env()?;
    SharedState::load(&config.state_file)
}

/// Log the pre-registered account in from wherever the page is
pub async fn login_registered(pm: &PageManager) -> ShopcheckResult<()> {
    pm.nav.login_link().click().await?;
    pm.auth
        .login_user(pm.credentials.email, pm.credentials.password)
        .await?;
    expect(&pm.nav.logged_in_text()).to_be_visible().await
}

/// Add the first listed product from the home page and open the cart
pub async fn add_first_product_and_open_cart(pm: &PageManager) -> ShopcheckResult<()> {
    pm.products.add_to_cart_first().click().await?;
    pm.nav.view_cart_link().click().await?;
    expect_page(pm.page()).to_have_url("/view_cart").await
}

/// Dismiss the "added to cart" modal
pub async fn continue_shopping(pm: &PageManager) -> ShopcheckResult<()> {
    pm.nav.continue_shopping_button().click().await?;
    expect(&pm.nav.cart_modal()).to_be_hidden().await
}
