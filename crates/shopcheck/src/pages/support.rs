//! Contact form and the footer newsletter subscription.

use super::PageArea;
use crate::data::ContactMessage;
use crate::dialog::DialogAction;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;

/// `/contact_us` plus the subscription box every page carries in its footer
#[derive(Debug, Clone)]
pub struct Support {
    page: Page,
}

impl PageArea for Support {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url_pattern(&self) -> Option<&str> {
        Some("/contact_us")
    }
}

impl Support {
    /// Bind to a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // =========================================================================
    // Contact form
    // =========================================================================

    /// Contact form name field
    #[must_use]
    pub fn name_input(&self) -> Locator {
        self.page.locator("[data-qa=\"name\"]")
    }

    /// Contact form email field
    #[must_use]
    pub fn email_input(&self) -> Locator {
        self.page.locator("[data-qa=\"email\"]")
    }

    /// Contact form subject field
    #[must_use]
    pub fn subject_input(&self) -> Locator {
        self.page.locator("[data-qa=\"subject\"]")
    }

    /// Contact form message textarea
    #[must_use]
    pub fn message_input(&self) -> Locator {
        self.page.locator("[data-qa=\"message\"]")
    }

    /// Contact form file input
    #[must_use]
    pub fn upload_input(&self) -> Locator {
        self.page.locator("input[name=\"upload_file\"]")
    }

    /// Contact form submit button
    #[must_use]
    pub fn submit_button(&self) -> Locator {
        self.page.locator("[data-qa=\"submit-button\"]")
    }

    /// "Success! Your details have been submitted successfully."
    #[must_use]
    pub fn success_alert(&self) -> Locator {
        self.page.locator("h2 + div.alert-success")
    }

    /// "Home" button shown after a successful contact submission
    #[must_use]
    pub fn home_button(&self) -> Locator {
        self.page.locator("a.btn-success")
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// The storefront misspells this id
    #[must_use]
    pub fn subscribe_email_input(&self) -> Locator {
        self.page.locator("#susbscribe_email")
    }

    /// Footer subscription arrow button
    #[must_use]
    pub fn subscribe_button(&self) -> Locator {
        self.page.locator("#subscribe")
    }

    /// "You have been successfully subscribed!" notice in the footer
    #[must_use]
    pub fn subscribe_success(&self) -> Locator {
        self.page.locator("#success-subscribe")
    }

    // =========================================================================
    // Composite actions
    // =========================================================================

    /// Fill the four text fields and attach the file, if any. Does not submit.
    pub async fn fill_contact_form(&self, message: &ContactMessage) -> ShopcheckResult<()> {
        self.name_input().fill(&message.name).await?;
        self.email_input().fill(&message.email).await?;
        self.subject_input().fill(&message.subject).await?;
        self.message_input().fill(&message.message).await?;
        if let Some(file) = &message.attachment {
            tracing::debug!(name = %file.name, bytes = file.size(), "attaching");
            self.upload_input()
                .set_input_files(std::slice::from_ref(file))
                .await?;
        }
        Ok(())
    }

    /// Submit the form; the page asks for confirmation through a native dialog
    pub async fn submit_contact_form(&self) -> ShopcheckResult<()> {
        self.page.once_dialog(DialogAction::Accept).await?;
        self.submit_button().click().await
    }

    /// Subscribe `email` to the newsletter from the footer
    pub async fn subscribe(&self, email: &str) -> ShopcheckResult<()> {
        self.subscribe_email_input().scroll_into_view().await?;
        self.subscribe_email_input().fill(email).await?;
        self.subscribe_button().click().await
    }
}
