//! Cart contents, totals, checkout and payment against the live storefront.

mod common;

use futures::TryFutureExt;
use shopcheck::prelude::*;
use shopcheck::wait::optional;
use std::time::Duration;

const PRICE_TOLERANCE: f64 = 0.01;

/// Logged in, one product in the cart, on the payment form
async fn reach_payment(pm: &PageManager, comment: &str) -> ShopcheckResult<()> {
    pm.nav.products_link().click().await?;
    pm.products.add_to_cart_first().click().await?;
    pm.nav.view_cart_link().click().await?;
    pm.cart.proceed_to_checkout_button().click().await?;
    pm.checkout.place_order(comment).await?;
    expect_page(pm.page()).to_have_url("/payment").await
}

#[tokio::test]
async fn test_guest_checkout_redirects_to_login() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    common::add_first_product_and_open_cart(pm).await?;

    pm.cart.proceed_to_checkout_button().click().await?;
    expect(&pm.cart.checkout_modal()).to_be_visible().await?;
    pm.cart.checkout_modal_login_link().click().await?;
    expect_page(pm.page()).to_have_url("/login").await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_fresh_session_has_empty_cart() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.cart_link().click().await?;
    expect(&pm.cart.empty_message()).to_be_visible().await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_remove_product_empties_cart() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    common::add_first_product_and_open_cart(pm).await?;
    pm.cart.remove_first_button().click().await?;
    expect(&pm.cart.empty_message()).to_be_visible().await?;
    expect(&pm.cart.empty_message())
        .to_contain_text("Cart is empty!")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_quantity_update_recomputes_line_total() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    common::add_first_product_and_open_cart(pm).await?;

    let unit_price = pm.cart.get_price_value(&pm.cart.unit_prices().first()).await?;
    pm.cart.quantity_input(0).fill("5").await?;
    pm.cart.quantity_input(0).press("Enter").await?;

    let total = pm.cart.get_price_value(&pm.cart.total_prices().first()).await?;
    assert_close(total, unit_price * 5.0, PRICE_TOLERANCE)?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_full_order_and_payment() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    common::login_registered(pm).await?;
    reach_payment(pm, "Please deliver before 5 PM.").await?;
    pm.payment.fill_payment_details(&valid_payment()).await?;

    expect_page(pm.page()).to_have_url("/payment_done").await?;
    expect(&pm.payment.confirmation_message())
        .to_contain_text("Congratulations! Your order has been confirmed!")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_detail_quantity_is_clamped_below_1000() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    pm.products.view_product_link(0).click().await?;
    pm.product_details.add_quantity_to_cart(999_999).await?;
    pm.nav.view_cart_link().click().await?;

    let quantity = pm.cart.quantity_input(0).input_value().await?;
    let quantity: u64 = quantity.trim().parse().map_err(|_| {
        ShopcheckError::assertion(format!("cart quantity {quantity:?} is not a number"))
    })?;
    assert!(quantity < 1000, "quantity {quantity} was not clamped");

    fixture.teardown().await
}

#[tokio::test]
async fn test_cart_total_is_sum_of_unit_prices() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    pm.products.add_to_cart_first().click().await?;
    common::continue_shopping(pm).await?;

    let second = pm.products.product_wrappers().nth(1);
    second.hover().await?;
    second.locator(".add-to-cart").first().click().await?;
    pm.nav.view_cart_link().click().await?;

    let mut expected = 0.0;
    for text in pm.cart.unit_prices().all_inner_texts().await? {
        expected += parse_price(&text)?;
    }
    let first_line = pm.cart.get_price_value(&pm.cart.line_totals().nth(0)).await?;
    let second_line = pm.cart.get_price_value(&pm.cart.line_totals().nth(1)).await?;
    assert_close(first_line + second_line, expected, PRICE_TOLERANCE)?;

    let summary = pm.cart.items().await?;
    assert!(summary.line_totals_consistent(PRICE_TOLERANCE));

    fixture.teardown().await
}

#[tokio::test]
async fn test_order_comment_is_kept_on_review() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    common::login_registered(pm).await?;
    let comment = "Please ensure the packaging is sturdy.";
    pm.nav.products_link().click().await?;
    pm.products.add_to_cart_first().click().await?;
    pm.nav.view_cart_link().click().await?;
    pm.cart.proceed_to_checkout_button().click().await?;
    pm.checkout.comment_input().fill(comment).await?;
    pm.checkout.place_order_button().click().await?;

    expect(&pm.checkout.readonly_fields())
        .to_have_value(comment)
        .await?;
    pm.payment.fill_payment_details(&valid_payment()).await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_guest_checkout_prompts_for_login() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.products_link().click().await?;
    common::add_first_product_and_open_cart(pm).await?;
    pm.cart.proceed_to_checkout_button().click().await?;
    expect(&pm.cart.checkout_modal_message()).to_be_visible().await?;
    expect_page(pm.page())
        .not()
        .to_have_url("payment_done|checkout")
        .await?;

    fixture.teardown().await
}

async fn assert_payment_rejected(pm: &PageManager, details: &PaymentDetails) -> ShopcheckResult<()> {
    pm.nav.cart_link().click().await?;
    pm.cart.proceed_to_checkout_button().click().await?;
    pm.checkout.place_order(&details.name).await?;
    pm.payment.fill_payment_details(details).await?;
    let confirmed = optional(
        "payment confirmation",
        pm.page()
            .wait_for_url_within("/payment_done", Duration::from_secs(3))
            .map_ok(drop),
    )
    .await?;
    if confirmed {
        return Err(ShopcheckError::assertion(format!(
            "{} was accepted and reached {}",
            details.name,
            pm.page().url().await?
        )));
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_payment_data_is_rejected() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    common::login_registered(pm).await?;
    reach_payment(pm, "invalid payment data").await?;
    for details in invalid_payments() {
        assert_payment_rejected(pm, &details).await?;
    }

    fixture.teardown().await
}

#[tokio::test]
async fn test_empty_payment_data_is_rejected() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    common::login_registered(pm).await?;
    reach_payment(pm, "empty payment data").await?;
    for details in empty_payments() {
        assert_payment_rejected(pm, &details).await?;
    }

    fixture.teardown().await
}
