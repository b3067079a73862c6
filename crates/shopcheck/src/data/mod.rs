//! Static test data consumed by the scenario suites.

pub mod credentials;
pub mod payment;

pub use credentials::{
    default_account, default_address, registered_user, AccountDetails, AddressDetails,
    ContactMessage, Gender, RegisteredUser, EXISTING_SIGNUP_EMAIL,
};
pub use payment::{empty_payments, invalid_payments, valid_payment, PaymentDetails};
