//! Hostile input and session-abuse checks.

mod common;

use shopcheck::prelude::*;

const SENSITIVE_TERMS: [&str; 5] = ["SQL", "stack trace", "Exception", "Node.js", "Express"];

#[tokio::test]
async fn test_login_resists_sql_injection() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth.login_user("' OR '1'='1", "password123").await?;
    expect(&pm.auth.login_heading()).to_be_visible().await?;
    expect(&pm.nav.logged_in_text()).not().to_be_visible().await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_review_does_not_echo_script_tags() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();
    let payload = "<script>alert('xss')</script>";

    pm.nav.go_to_product_details(1).await?;
    pm.product_details
        .submit_review("Hacker", "test@test.com", payload)
        .await?;
    expect(&pm.product_details.review_success())
        .to_be_visible()
        .await?;
    expect(&pm.product_details.review_section())
        .not()
        .to_contain_text(payload)
        .await?;
    assert!(
        pm.page().dialogs().is_empty(),
        "review payload raised a dialog"
    );

    fixture.teardown().await
}

#[tokio::test]
async fn test_out_of_range_product_fails_gracefully() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.go_to_product_details(99_999).await?;
    expect_page(pm.page())
        .not()
        .to_have_title("Product Details")
        .await?;
    expect(&pm.product_details.price())
        .not()
        .to_be_visible()
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_repeated_failed_logins_stay_logged_out() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    for attempt in 0..5 {
        pm.auth
            .login_user("victim@example.com", &format!("wrong_pass_{attempt}"))
            .await?;
    }
    expect(&pm.auth.login_heading()).to_be_visible().await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_contact_form_rejects_executable_upload() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.contact_link().click().await?;
    pm.support
        .upload_input()
        .set_input_files(&[FilePayload::guessed(
            "malware.js",
            b"console.log(\"malicious code\")".to_vec(),
        )])
        .await?;
    pm.support.submit_button().click().await?;
    expect(&pm.support.success_alert())
        .not()
        .to_be_visible()
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_checkout_ignores_tampered_total() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.go_to_product_details(2).await?;
    pm.product_details.add_to_cart_button().click().await?;
    pm.nav.view_cart_link().click().await?;

    pm.page()
        .route(RouteRule::new(
            UrlPattern::Glob("**/checkout".to_string()),
            HttpMethod::Post,
            PayloadRewrite::set_field("total_amount", "0.01"),
        ))
        .await?;
    pm.cart.proceed_to_checkout_button().click().await?;
    expect_page(pm.page())
        .not()
        .to_have_url("payment_done")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_logout_clears_session() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth
        .login_user("testuser@test.com", "password123")
        .await?;
    pm.nav.logout().await?;

    pm.nav.cart_link().click().await?;
    expect(&pm.nav.login_link()).to_be_visible().await?;
    expect(&pm.nav.logged_in_text()).not().to_be_visible().await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_foreign_origin_account_deletion_is_refused() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth
        .login_user("testuser@test.com", "password123")
        .await?;

    let response = pm
        .page()
        .post_with_session(
            "/delete_account",
            &[("Origin", "http://malicious-site.com")],
            &[("confirm", "true")],
        )
        .await?;
    assert!(
        !response.landed_on("account_deleted"),
        "foreign-origin delete was accepted: {response:?}"
    );
    assert_ne!(response.status, 200, "foreign-origin delete ended in 200: {response:?}");

    fixture.teardown().await
}

#[tokio::test]
async fn test_weak_password_does_not_create_account() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth.register_user("SecTest", "sectest@test.com").await?;
    pm.auth.password_input().fill("12345").await?;
    pm.auth.create_account_button().click().await?;
    expect(&pm.auth.account_created_heading())
        .not()
        .to_be_visible()
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_errors_do_not_leak_stack_details() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth.login_user("~`#$%^&*()", "pass").await?;

    let body = pm.page().inner_text("body").await?.to_lowercase();
    for term in SENSITIVE_TERMS {
        assert!(
            !body.contains(&term.to_lowercase()),
            "page body mentions {term:?}"
        );
    }

    fixture.teardown().await
}
