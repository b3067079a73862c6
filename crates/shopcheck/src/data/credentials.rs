//! Accounts and form data.

use crate::upload::FilePayload;
use serde::{Deserialize, Serialize};

/// E-mail that is already registered on the storefront
pub const EXISTING_SIGNUP_EMAIL: &str = "johndoesecond@johndoe.com";

/// A pre-existing storefront account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Login e-mail
    pub email: &'static str,
    /// Login password
    pub password: &'static str,
    /// Name shown in the "Logged in as" banner
    pub full_name: &'static str,
}

/// The shared login account used by login, checkout and cart suites
#[must_use]
pub const fn registered_user() -> RegisteredUser {
    RegisteredUser {
        email: "johndoeseventh@johndoe.com",
        password: "password",
        full_name: "Jhon Doe",
    }
}

/// Title radio on the signup form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Mr.
    #[default]
    Male,
    /// Mrs.
    Female,
}

impl Gender {
    /// Radio button selector
    #[must_use]
    pub const fn radio_selector(&self) -> &'static str {
        match self {
            Self::Male => "#id_gender1",
            Self::Female => "#id_gender2",
        }
    }
}

/// "Enter Account Information" section of the signup form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Title radio
    pub gender: Gender,
    /// Account password
    pub password: String,
    /// Birth day option value
    pub day: String,
    /// Birth month option value
    pub month: String,
    /// Birth year option value
    pub year: String,
    /// Newsletter checkbox
    pub newsletter: bool,
    /// Special offers checkbox
    pub optin: bool,
}

impl AccountDetails {
    /// Details with the given password and no optional subscriptions
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            gender: Gender::Male,
            password: password.into(),
            day: "1".to_string(),
            month: "1".to_string(),
            year: "1990".to_string(),
            newsletter: false,
            optin: false,
        }
    }

    /// Tick both subscription checkboxes
    #[must_use]
    pub const fn subscribed(mut self) -> Self {
        self.newsletter = true;
        self.optin = true;
        self
    }
}

/// Account details used by full registrations
pub fn default_account(password: impl Into<String>) -> AccountDetails {
    AccountDetails::with_password(password).subscribed()
}

/// "Address Information" section of the signup form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Street line
    pub address1: String,
    /// Country option label
    pub country: String,
    /// State
    pub state: String,
    /// City
    pub city: String,
    /// Postal code
    pub zip: String,
    /// Mobile number
    pub mobile: String,
}

/// The US address used by full registrations
#[must_use]
pub fn default_address() -> AddressDetails {
    AddressDetails {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        address1: "123 Test Street".to_string(),
        country: "United States".to_string(),
        state: "New York".to_string(),
        city: "New York".to_string(),
        zip: "10001".to_string(),
        mobile: "1234567890".to_string(),
    }
}

/// A "Contact Us" submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Sender e-mail
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
    /// Optional attachment
    pub attachment: Option<FilePayload>,
}

impl ContactMessage {
    /// Message without attachment
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
            attachment: None,
        }
    }

    /// Attach a file
    #[must_use]
    pub fn with_attachment(mut self, file: FilePayload) -> Self {
        self.attachment = Some(file);
        self
    }
}
