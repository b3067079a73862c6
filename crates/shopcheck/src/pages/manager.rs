//! One handle on every page area.

use super::{Auth, Cart, Checkout, Navigation, Payment, ProductDetails, Products, Support};
use crate::data::{registered_user, RegisteredUser};
use crate::page::Page;

/// Every page area bound to the same page, plus the pre-registered account.
///
/// Cloning is cheap; all areas share the page's driver.
#[derive(Debug, Clone)]
pub struct PageManager {
    pub nav: Navigation,
    pub auth: Auth,
    pub products: Products,
    pub product_details: ProductDetails,
    pub cart: Cart,
    pub checkout: Checkout,
    pub payment: Payment,
    pub support: Support,
    /// Account used by scenarios that need an existing login
    pub credentials: RegisteredUser,
    page: Page,
}

impl PageManager {
    /// Bind every area to `page`
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            nav: Navigation::new(page.clone()),
            auth: Auth::new(page.clone()),
            products: Products::new(page.clone()),
            product_details: ProductDetails::new(page.clone()),
            cart: Cart::new(page.clone()),
            checkout: Checkout::new(page.clone()),
            payment: Payment::new(page.clone()),
            support: Support::new(page.clone()),
            credentials: registered_user(),
            page,
        }
    }

    /// The shared page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }
}
