//! Contact form, newsletter, responsive layout and footer links.

mod common;

use shopcheck::prelude::*;

fn subscriber_email() -> String {
    format!("sub_{}@test.com", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_contact_form_with_upload() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.contact_link().click().await?;
    expect_page(pm.page()).to_have_url("/contact_us").await?;
    expect_page(pm.page()).to_have_title("Contact Us").await?;
    assert!(pm.support.is_current().await?);

    let message = ContactMessage::new(
        "QA Tester",
        "test@test.com",
        "E2E Testing Subject",
        "This is a test message.",
    )
    .with_attachment(FilePayload::new(
        "test.txt",
        "text/plain",
        b"this is test data".to_vec(),
    ));
    pm.support.fill_contact_form(&message).await?;
    pm.support.submit_contact_form().await?;

    expect(&pm.support.success_alert())
        .to_contain_text("Success! Your details have been submitted successfully.")
        .await?;
    let dialogs = pm.page().dialogs();
    assert_eq!(dialogs.len(), 1, "expected one confirmation dialog");
    assert_eq!(dialogs[0].action, DialogAction::Accept);

    fixture.teardown().await
}

#[tokio::test]
async fn test_contact_form_requires_fields() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.contact_link().click().await?;
    pm.support.submit_contact_form().await?;
    expect(&pm.support.success_alert())
        .not()
        .to_be_visible()
        .await?;

    pm.support
        .fill_contact_form(&ContactMessage::new(
            "QA Tester",
            "test@test.com",
            "Required fields",
            "All fields filled this time.",
        ))
        .await?;
    pm.support.submit_contact_form().await?;
    expect(&pm.support.success_alert())
        .to_have_text("Success! Your details have been submitted successfully.")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_footer_subscription() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.support.subscribe(&subscriber_email()).await?;
    expect(&pm.support.subscribe_success()).to_be_visible().await?;
    expect(&pm.support.subscribe_success())
        .to_contain_text("You have been successfully subscribed!")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_mobile_viewport_keeps_logo() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.resize_window(375, 667).await?;
    pm.nav.go_to_home_page().await?;
    expect(&pm.nav.logo()).to_be_visible().await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_subscription_from_cart_page() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.cart_link().click().await?;
    pm.support.subscribe(&subscriber_email()).await?;
    expect(&pm.support.subscribe_success()).to_be_visible().await?;
    expect(&pm.support.subscribe_success())
        .to_contain_text("You have been successfully subscribed!")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_api_testing_link() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.api_testing_link().click().await?;
    expect_page(pm.page()).to_have_url("/api_list").await?;

    fixture.teardown().await
}
