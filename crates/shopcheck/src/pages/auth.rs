//! Login, signup and account lifecycle.

use super::PageArea;
use crate::data::{AccountDetails, AddressDetails, Gender};
use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// The `/login` page and the account-information form that follows signup
#[derive(Debug, Clone)]
pub struct Auth {
    page: Page,
}

impl PageArea for Auth {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/login")
    }
}

impl Auth {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // =========================================================================
    // Login & signup forms
    // =========================================================================

    /// "Login to your account" heading above the login form
    #[must_use]
    pub fn login_heading(&self) -> Locator {
        self.page.get_by_text("Login to your account")
    }

    /// Email field of the login form
    #[must_use]
    pub fn login_email_input(&self) -> Locator {
        self.page.locator("[data-qa=\"login-email\"]")
    }

    /// Password field of the login form
    #[must_use]
    pub fn login_password_input(&self) -> Locator {
        self.page.locator("[data-qa=\"login-password\"]")
    }

    /// Login form submit button
    #[must_use]
    pub fn login_button(&self) -> Locator {
        self.page.locator("[data-qa=\"login-button\"]")
    }

    /// Name field of the "New User Signup!" form
    #[must_use]
    pub fn signup_name_input(&self) -> Locator {
        self.page.locator("[data-qa=\"signup-name\"]")
    }

    /// Email field of the signup form
    #[must_use]
    pub fn signup_email_input(&self) -> Locator {
        self.page.locator("[data-qa=\"signup-email\"]")
    }

    /// Signup form submit button
    #[must_use]
    pub fn signup_button(&self) -> Locator {
        self.page.locator("[data-qa=\"signup-button\"]")
    }

    /// Inline error under the signup form ("Email Address already exist!")
    #[must_use]
    pub fn signup_error(&self) -> Locator {
        self.page.locator("form[action=\"/signup\"] p")
    }

    // =========================================================================
    // Account information
    // =========================================================================

    /// Title radio button (`#id_gender1` / `#id_gender2`) for `gender`
    #[must_use]
    pub fn gender_radio(&self, gender: Gender) -> Locator {
        self.page.locator(gender.radio_selector())
    }

    /// Account password on the details form
    #[must_use]
    pub fn password_input(&self) -> Locator {
        self.page.locator("[data-qa=\"password\"]")
    }

    /// Birth day dropdown
    #[must_use]
    pub fn day_select(&self) -> Locator {
        self.page.locator("#days")
    }

    /// Birth month dropdown
    #[must_use]
    pub fn month_select(&self) -> Locator {
        self.page.locator("#months")
    }

    /// Birth year dropdown
    #[must_use]
    pub fn year_select(&self) -> Locator {
        self.page.locator("#years")
    }

    /// "Sign up for our newsletter!" checkbox
    #[must_use]
    pub fn newsletter_checkbox(&self) -> Locator {
        self.page.locator("#newsletter")
    }

    /// "Receive special offers" checkbox
    #[must_use]
    pub fn optin_checkbox(&self) -> Locator {
        self.page.locator("#optin")
    }

    // =========================================================================
    // Address information
    // =========================================================================

    /// Address first name
    #[must_use]
    pub fn first_name_input(&self) -> Locator {
        self.page.locator("[data-qa=\"first_name\"]")
    }

    /// Address last name
    #[must_use]
    pub fn last_name_input(&self) -> Locator {
        self.page.locator("[data-qa=\"last_name\"]")
    }

    /// First street-address line
    #[must_use]
    pub fn address_input(&self) -> Locator {
        self.page.locator("[data-qa=\"address\"]")
    }

    /// Country dropdown
    #[must_use]
    pub fn country_select(&self) -> Locator {
        self.page.locator("[data-qa=\"country\"]")
    }

    /// State field
    #[must_use]
    pub fn state_input(&self) -> Locator {
        self.page.locator("[data-qa=\"state\"]")
    }

    /// City field
    #[must_use]
    pub fn city_input(&self) -> Locator {
        self.page.locator("[data-qa=\"city\"]")
    }

    /// Zipcode field
    #[must_use]
    pub fn zip_input(&self) -> Locator {
        self.page.locator("[data-qa=\"zipcode\"]")
    }

    /// Mobile number field
    #[must_use]
    pub fn mobile_input(&self) -> Locator {
        self.page.locator("[data-qa=\"mobile_number\"]")
    }

    /// "Create Account" submit button
    #[must_use]
    pub fn create_account_button(&self) -> Locator {
        self.page.locator("[data-qa=\"create-account\"]")
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// "ACCOUNT CREATED!" heading
    #[must_use]
    pub fn account_created_heading(&self) -> Locator {
        self.page.locator("h2[data-qa=\"account-created\"]")
    }

    /// "ACCOUNT DELETED!" heading
    #[must_use]
    pub fn account_deleted_heading(&self) -> Locator {
        self.page.locator("h2[data-qa=\"account-deleted\"]")
    }

    /// "Continue" button shown after account creation or deletion
    #[must_use]
    pub fn continue_button(&self) -> Locator {
        self.page.locator("[data-qa=\"continue-button\"]")
    }

    /// Green button leading back home
    #[must_use]
    pub fn success_home_button(&self) -> Locator {
        self.page.locator("a.btn-success")
    }

    // =========================================================================
    // Composite actions
    // =========================================================================

    /// Fill the "New User Signup!" form and submit it
    pub async fn register_user(&self, name: &str, email: &str) -> ShopcheckResult<()> {
        tracing::info!(%email, "signup");
        self.signup_name_input().fill(name).await?;
        self.signup_email_input().fill(email).await?;
        self.signup_button().click().await
    }

    /// Fill the login form and submit it
    pub async fn login_user(&self, email: &str, password: &str) -> ShopcheckResult<()> {
        tracing::info!(%email, "login");
        self.login_email_input().fill(email).await?;
        self.login_password_input().fill(password).await?;
        self.login_button().click().await
    }

    /// Fill "Enter Account Information"; checkboxes are only ever checked
    pub async fn fill_account_details(&self, details: &AccountDetails) -> ShopcheckResult<()> {
        self.gender_radio(details.gender).check().await?;
        self.password_input().fill(&details.password).await?;
        self.day_select().select_option(&details.day).await?;
        self.month_select().select_option(&details.month).await?;
        self.year_select().select_option(&details.year).await?;
        if details.newsletter {
            self.newsletter_checkbox().check().await?;
        }
        if details.optin {
            self.optin_checkbox().check().await?;
        }
        Ok(())
    }

    /// Fill "Address Information" and submit the whole form
    pub async fn fill_address_details(&self, address: &AddressDetails) -> ShopcheckResult<()> {
        self.first_name_input().fill(&address.first_name).await?;
        self.last_name_input().fill(&address.last_name).await?;
        self.address_input().fill(&address.address1).await?;
        self.country_select().select_option(&address.country).await?;
        self.state_input().fill(&address.state).await?;
        self.city_input().fill(&address.city).await?;
        self.zip_input().fill(&address.zip).await?;
        self.mobile_input().fill(&address.mobile).await?;
        self.create_account_button().click().await
    }

    /// Signup through "Account Created!", leaving the new user logged in.
    ///
    /// Expects to start on the login page.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        account: &AccountDetails,
        address: &AddressDetails,
    ) -> ShopcheckResult<()> {
        self.register_user(name, email).await?;
        expect(&self.password_input()).to_be_visible().await?;
        self.fill_account_details(account).await?;
        self.fill_address_details(address).await?;
        expect(&self.account_created_heading()).to_be_visible().await?;
        self.continue_button().click().await?;
        tracing::info!(%email, "account created");
        Ok(())
    }
}
