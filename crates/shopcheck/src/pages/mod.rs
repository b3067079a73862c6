//! Page Object Model for the storefront.
//!
//! One struct per page area. Each holds the shared [`Page`] and exposes
//! accessors that build [`Locator`]s on demand plus a few composite actions
//! that chain them. Accessors never assert; only the two verifying helpers in
//! [`base`] do.
//!
//! [`PageManager`] binds one instance of every area to the active page.

pub mod auth;
pub mod base;
pub mod cart;
pub mod checkout;
pub mod manager;
pub mod navigation;
pub mod payment;
pub mod product_details;
pub mod products;
pub mod support;

pub use auth::Auth;
pub use cart::{Cart, CartItem, CartSummary};
pub use checkout::Checkout;
pub use manager::PageManager;
pub use navigation::Navigation;
pub use payment::Payment;
pub use product_details::ProductDetails;
pub use products::Products;
pub use support::Support;

use crate::dialog::DialogAction;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::ShopcheckResult;
use async_trait::async_trait;

/// Capabilities shared by every page area.
///
/// Implementors only supply [`page`](PageArea::page) and, when the area owns
/// a route, [`url_pattern`](PageArea::url_pattern); the helpers come for free.
#[async_trait]
pub trait PageArea: Send + Sync {
    /// Page this area is bound to
    fn page(&self) -> &Page;

    /// Path pattern of the route this area lives on (e.g. `/product_details/:id`)
    fn url_pattern(&self) -> Option<&str> {
        None
    }

    /// Area name for logging
    fn area_name(&self) -> &str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("area")
    }

    /// Whether the browser is currently on this area's route
    async fn is_current(&self) -> ShopcheckResult<bool> {
        let Some(pattern) = self.url_pattern() else {
            return Ok(false);
        };
        let url = self.page().url().await?;
        Ok(UrlMatcher::new(pattern).matches(&url))
    }

    /// Scroll the window to a vertical offset
    async fn scroll_to(&self, y: i64) -> ShopcheckResult<()> {
        base::scroll_to(self.page(), y).await
    }

    /// Resize the viewport
    async fn resize_window(&self, width: u32, height: u32) -> ShopcheckResult<()> {
        base::resize_window(self.page(), width, height).await
    }

    /// Accept the next native dialog
    async fn accept_next_dialog(&self) -> ShopcheckResult<()> {
        self.page().once_dialog(DialogAction::Accept).await
    }

    /// Parse the rendered price of the first match
    async fn get_price_value(&self, locator: &Locator) -> ShopcheckResult<f64> {
        base::get_price_value(locator).await
    }

    /// Fail unless `container` shows `line`
    async fn verify_address_details(&self, container: &Locator, line: &str) -> ShopcheckResult<()> {
        base::verify_address_details(container, line).await
    }
}

/// Path matcher for area routes.
///
/// Patterns support literal segments (`/view_cart`), wildcards (`/brand_products/*`)
/// and named parameters (`/product_details/:id`). Scheme, host, query and
/// fragment of the URL are ignored.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Wildcard,
    Param(String),
}

impl UrlMatcher {
    /// Compile a pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .into_iter()
            .map(|s| {
                if s == "*" {
                    Segment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    /// Check a full URL or bare path against the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let parts = split_path(path_of(url));
        parts.len() == self.segments.len()
            && self.segments.iter().zip(&parts).all(|(seg, part)| match seg {
                Segment::Literal(lit) => lit == part,
                Segment::Wildcard | Segment::Param(_) => true,
            })
    }

    /// Named parameters of a matching URL
    #[must_use]
    pub fn params(&self, url: &str) -> Vec<(String, String)> {
        if !self.matches(url) {
            return Vec::new();
        }
        let parts = split_path(path_of(url));
        self.segments
            .iter()
            .zip(parts)
            .filter_map(|(seg, part)| match seg {
                Segment::Param(name) => Some((name.clone(), part.to_string())),
                _ => None,
            })
            .collect()
    }
}

fn path_of(url: &str) -> &str {
    let rest = url
        .find("://")
        .map_or(url, |i| &url[i + 3..]);
    let rest = if url.contains("://") {
        rest.find('/').map_or("", |i| &rest[i..])
    } else {
        rest
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
