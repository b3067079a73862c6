//! Card payment form.

use super::PageArea;
use crate::data::PaymentDetails;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// `/payment` and the `/payment_done` confirmation that follows it
#[derive(Debug, Clone)]
pub struct Payment {
    page: Page,
}

impl PageArea for Payment {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/payment")
    }
}

impl Payment {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// "Name on Card" field
    #[must_use]
    pub fn name_on_card_input(&self) -> Locator {
        self.page.locator("[data-qa=\"name-on-card\"]")
    }

    /// Card number field
    #[must_use]
    pub fn card_number_input(&self) -> Locator {
        self.page.locator("[data-qa=\"card-number\"]")
    }

    /// CVC field
    #[must_use]
    pub fn cvc_input(&self) -> Locator {
        self.page.locator("[data-qa=\"cvc\"]")
    }

    /// Expiration month (MM)
    #[must_use]
    pub fn expiry_month_input(&self) -> Locator {
        self.page.locator("[data-qa=\"expiry-month\"]")
    }

    /// Expiration year (YYYY)
    #[must_use]
    pub fn expiry_year_input(&self) -> Locator {
        self.page.locator("[data-qa=\"expiry-year\"]")
    }

    /// "Pay and Confirm Order" button
    #[must_use]
    pub fn pay_button(&self) -> Locator {
        self.page.locator("[data-qa=\"pay-button\"]")
    }

    /// "Congratulations! Your order has been confirmed!"
    #[must_use]
    pub fn confirmation_message(&self) -> Locator {
        self.page.locator(".col-sm-9 p").first()
    }

    /// Fill every card field and press "Pay and Confirm Order" once.
    ///
    /// Rejected cards are not retried; callers inspect the resulting page.
    pub async fn fill_payment_details(&self, details: &PaymentDetails) -> ShopcheckResult<()> {
        self.name_on_card_input().fill(&details.card_name).await?;
        self.card_number_input().fill(&details.card_number).await?;
        self.cvc_input().fill(&details.cvc).await?;
        self.expiry_month_input().fill(&details.expiry_month).await?;
        self.expiry_year_input().fill(&details.expiry_year).await?;
        tracing::info!(set = %details.name, "payment submitted");
        self.pay_button().click().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::data::{empty_payments, valid_payment};
    use crate::driver::MockDriver;
    use std::sync::Arc;

    fn payment_with(driver: &MockDriver) -> Payment {
        Payment::new(Page::new(Arc::new(driver.clone()), SuiteConfig::default()))
    }

    #[tokio::test]
    async fn test_fill_payment_details_sequence() {
        let driver = MockDriver::new();
        payment_with(&driver)
            .fill_payment_details(&valid_payment())
            .await
            .unwrap();
        assert_eq!(
            driver.history_lines(),
            vec![
                "fill [data-qa=\"name-on-card\"] = John Doe",
                "fill [data-qa=\"card-number\"] = 4100 0000 0000 0000",
                "fill [data-qa=\"cvc\"] = 123",
                "fill [data-qa=\"expiry-month\"] = 01",
                "fill [data-qa=\"expiry-year\"] = 2027",
                "click [data-qa=\"pay-button\"]",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_field_is_still_written_and_pay_clicked_once() {
        let driver = MockDriver::new();
        let payment = payment_with(&driver);
        let blank_cvc = empty_payments()
            .into_iter()
            .find(|p| p.cvc.is_empty())
            .unwrap();
        payment.fill_payment_details(&blank_cvc).await.unwrap();
        let actions = driver.actions();
        assert_eq!(actions.len(), 6);
        assert_eq!(actions[2].arg.as_deref(), Some(""));
        assert_eq!(actions.iter().filter(|t| t.op == "click").count(), 1);
    }
}
