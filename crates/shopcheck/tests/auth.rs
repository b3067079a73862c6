//! Signup rejection, login and logout with the pre-registered account.

mod common;

use shopcheck::prelude::*;

#[tokio::test]
async fn test_signup_with_existing_email_is_rejected() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    pm.nav.login_link().click().await?;
    pm.auth
        .register_user("Duplicate User", EXISTING_SIGNUP_EMAIL)
        .await?;
    expect(&pm.auth.signup_error())
        .to_contain_text("Email Address already exist!")
        .await?;

    fixture.teardown().await
}

#[tokio::test]
async fn test_login_with_valid_credentials() -> ShopcheckResult<()> {
    let mut fixture = common::storefront().await?;
    fixture.with_fixture(LoginFixture::registered()).await?;
    let pm = fixture.pm();

    expect(&pm.nav.logged_in_text()).to_be_visible().await?;
    expect(&pm.nav.logged_in_as(pm.credentials.full_name))
        .to_be_visible()
        .await?;
    assert!(fixture.fixtures().is_registered::<LoginFixture>());

    // Teardown logs out through the fixture
    fixture.teardown().await
}

#[tokio::test]
async fn test_logout_returns_to_login() -> ShopcheckResult<()> {
    let fixture = common::storefront().await?;
    let pm = fixture.pm();

    common::login_registered(pm).await?;
    pm.nav.logout().await?;

    let url = pm.nav.page_url().await?;
    assert!(url.contains("/login"), "logout landed on {url}");
    expect(&pm.auth.login_heading()).to_be_visible().await?;

    fixture.teardown().await
}
