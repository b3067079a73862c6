//! Price text parsing.
//!
//! Rendered prices look like `Rs. 500` or `$ 25.00`. Every non-digit is
//! stripped except a `.` whose preceding character in the original text is a
//! digit, so currency abbreviations ending in a dot never become decimal
//! points. The cleaned string is then read the way `parseFloat` reads it:
//! the longest leading `digits[.digits]` prefix.

use crate::result::{ShopcheckError, ShopcheckResult};

/// Keep digits and digit-preceded dots
#[must_use]
pub fn clean_price_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if c.is_ascii_digit() || (c == '.' && prev.is_some_and(|p| p.is_ascii_digit())) {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Parse a rendered price into a number
pub fn parse_price(text: &str) -> ShopcheckResult<f64> {
    let cleaned = clean_price_text(text);
    let digits_end = cleaned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(cleaned.len());
    if digits_end == 0 {
        return Err(ShopcheckError::PriceParse {
            text: text.to_string(),
        });
    }
    let mut end = digits_end;
    if cleaned[end..].starts_with('.') {
        let fraction = cleaned[end + 1..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(cleaned.len() - end - 1);
        end += 1 + fraction;
    }
    cleaned[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .map_err(|_| ShopcheckError::PriceParse {
            text: text.to_string(),
        })
}

/// Render a number the way the storefront prints it (`Rs. 500`)
#[must_use]
pub fn format_rupees(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("Rs. {amount:.0}")
    } else {
        format!("Rs. {amount:.2}")
    }
}
