//! Card data for the payment form.
//!
//! One accepted card plus the data-driven negative sets: three malformed and
//! five with a single blank field.

use serde::{Deserialize, Serialize};

/// One payment-form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Case label used in test output
    pub name: String,
    /// Name on card
    pub card_name: String,
    /// Card number
    pub card_number: String,
    /// CVC
    pub cvc: String,
    /// Expiry month (`MM`)
    pub expiry_month: String,
    /// Expiry year (`YYYY`)
    pub expiry_year: String,
}

impl PaymentDetails {
    fn variant(&self, name: &str, edit: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        next.name = name.to_string();
        edit(&mut next);
        next
    }
}

/// The card the storefront accepts
#[must_use]
pub fn valid_payment() -> PaymentDetails {
    PaymentDetails {
        name: "Valid Payment Data".to_string(),
        card_name: "John Doe".to_string(),
        card_number: "4100 0000 0000 0000".to_string(),
        cvc: "123".to_string(),
        expiry_month: "01".to_string(),
        expiry_year: "2027".to_string(),
    }
}

/// Malformed cards
#[must_use]
pub fn invalid_payments() -> Vec<PaymentDetails> {
    let valid = valid_payment();
    vec![
        valid.variant("Invalid Card Number Payment Data", |p| {
            p.card_number = "INVALID CARD NUMBER".to_string();
        }),
        valid.variant("Invalid CVC Payment Data", |p| {
            p.cvc = "INVALID CVC".to_string();
        }),
        valid.variant("Expired Card Payment Data", |p| {
            p.expiry_year = "2024".to_string();
        }),
    ]
}

/// Cards with exactly one blank field
#[must_use]
pub fn empty_payments() -> Vec<PaymentDetails> {
    let valid = valid_payment();
    vec![
        valid.variant("Empty Card Name Payment Data", |p| p.card_name.clear()),
        valid.variant("Empty Card Number Payment Data", |p| p.card_number.clear()),
        valid.variant("Empty CVC Payment Data", |p| p.cvc.clear()),
        valid.variant("Empty Expiry Month Payment Data", |p| p.expiry_month.clear()),
        valid.variant("Empty Expiry Year Payment Data", |p| p.expiry_year.clear()),
    ]
}
