//! Network request interception.
//!
//! Routes rewrite the payload of matching outgoing requests before they
//! leave the page. Matching follows glob rules where `**` spans path
//! segments and `*` stays within one.

use crate::result::{ShopcheckError, ShopcheckResult};
use serde::{Deserialize, Serialize};

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// Any method
    Any,
}

impl HttpMethod {
    /// Uppercase method name (`*` for any)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Any => "*",
        }
    }

    /// Check a method name against this filter
    #[must_use]
    pub fn matches(&self, method: &str) -> bool {
        matches!(self, Self::Any) || self.as_str().eq_ignore_ascii_case(method)
    }
}

/// URL pattern for matching requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Glob pattern (e.g., "**/checkout")
    Glob(String),
}

impl UrlPattern {
    /// Regex source equivalent to this pattern, valid in Rust and JavaScript
    #[must_use]
    pub fn to_regex_source(&self) -> String {
        match self {
            Self::Exact(url) => format!("^{}$", regex::escape(url)),
            Self::Contains(part) => regex::escape(part),
            Self::Regex(source) => source.clone(),
            Self::Glob(glob) => glob_to_regex(glob),
        }
    }

    /// Compile the pattern
    pub fn compile(&self) -> ShopcheckResult<regex::Regex> {
        let source = self.to_regex_source();
        regex::Regex::new(&source).map_err(|e| ShopcheckError::InvalidPattern {
            pattern: source,
            message: e.to_string(),
        })
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        self.compile().map(|re| re.is_match(url)).unwrap_or(false)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut rest = glob;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("**/") {
            out.push_str("(?:.*/)?");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("**") {
            out.push_str(".*");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            out.push_str("[^/]*");
            rest = tail;
        } else {
            out.push_str(&regex::escape(&c.to_string()));
            rest = &rest[c.len_utf8()..];
        }
    }
    out.push('$');
    out
}

/// How a matched request body is changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadRewrite {
    /// Set one top-level field to a string value
    SetField {
        /// Field name
        field: String,
        /// New value
        value: String,
    },
}

impl PayloadRewrite {
    /// Set one field
    pub fn set_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Apply the rewrite to a request body.
    ///
    /// JSON objects get the field replaced or inserted; anything else is
    /// treated as a form-encoded body.
    #[must_use]
    pub fn apply(&self, body: &str) -> String {
        let Self::SetField { field, value } = self;
        if let Ok(serde_json::Value::Object(mut map)) = serde_json::from_str(body) {
            map.insert(field.clone(), serde_json::Value::String(value.clone()));
            return serde_json::Value::Object(map).to_string();
        }

        let encoded = format!("{}={}", form_encode(field), form_encode(value));
        let mut replaced = false;
        let mut pairs: Vec<String> = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let key = pair.split_once('=').map_or(pair, |(k, _)| k);
                if key == form_encode(field) {
                    replaced = true;
                    encoded.clone()
                } else {
                    pair.to_string()
                }
            })
            .collect();
        if !replaced {
            pairs.push(encoded);
        }
        pairs.join("&")
    }
}

fn form_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// A request interception rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// URL filter
    pub pattern: UrlPattern,
    /// Method filter
    pub method: HttpMethod,
    /// Body change
    pub rewrite: PayloadRewrite,
}

impl RouteRule {
    /// Create a rule
    #[must_use]
    pub const fn new(pattern: UrlPattern, method: HttpMethod, rewrite: PayloadRewrite) -> Self {
        Self {
            pattern,
            method,
            rewrite,
        }
    }

    /// Whether a request is affected by this rule
    #[must_use]
    pub fn applies_to(&self, method: &str, url: &str) -> bool {
        self.method.matches(method) && self.pattern.matches(url)
    }

    /// In-page script installing this rule for fetch, XHR and form posts
    pub fn install_script(&self) -> ShopcheckResult<String> {
        // fail early on patterns the page could not compile either
        self.pattern.compile()?;
        let PayloadRewrite::SetField { field, value } = &self.rewrite;
        let rule = serde_json::json!({
            "source": self.pattern.to_regex_source(),
            "method": self.method.as_str(),
            "field": field,
            "value": value,
        });
        Ok(format!(
            "(() => {{ const rule = {rule}; {ROUTE_RUNTIME} }})()"
        ))
    }
}

const ROUTE_RUNTIME: &str = r#"
const w = window;
w.__shopcheckRoutes = w.__shopcheckRoutes || [];
w.__shopcheckRoutes.push(rule);
if (w.__shopcheckRouteHooks) { return true; }
w.__shopcheckRouteHooks = true;
const find = (method, url) => {
  const abs = new URL(url, location.href).href;
  return w.__shopcheckRoutes.find(r =>
    (r.method === '*' || r.method === String(method || 'GET').toUpperCase()) &&
    new RegExp(r.source).test(abs));
};
const rewrite = (r, body) => {
  if (typeof body === 'string') {
    try {
      const parsed = JSON.parse(body);
      if (parsed && typeof parsed === 'object' && !Array.isArray(parsed)) {
        parsed[r.field] = r.value;
        return JSON.stringify(parsed);
      }
    } catch (_) {}
    const params = new URLSearchParams(body);
    params.set(r.field, r.value);
    return params.toString();
  }
  if (body instanceof URLSearchParams) { body.set(r.field, r.value); return body; }
  if (body instanceof FormData) { body.set(r.field, r.value); return body; }
  return body;
};
const origFetch = w.fetch;
w.fetch = function(input, init) {
  const url = typeof input === 'string' ? input : input.url;
  const method = (init && init.method) || (typeof input === 'string' ? 'GET' : input.method);
  const r = find(method, url);
  if (r && init && 'body' in init) { init = Object.assign({}, init, { body: rewrite(r, init.body) }); }
  return origFetch.call(this, input, init);
};
const origOpen = XMLHttpRequest.prototype.open;
const origSend = XMLHttpRequest.prototype.send;
XMLHttpRequest.prototype.open = function(method, url) {
  this.__shopcheckRoute = find(method, url);
  return origOpen.apply(this, arguments);
};
XMLHttpRequest.prototype.send = function(body) {
  const r = this.__shopcheckRoute;
  return origSend.call(this, r ? rewrite(r, body) : body);
};
const patchForm = (form) => {
  const r = find(form.method, form.action || location.href);
  if (!r) { return; }
  let input = form.querySelector('input[name="' + r.field + '"]');
  if (!input) {
    input = document.createElement('input');
    input.type = 'hidden';
    input.name = r.field;
    form.appendChild(input);
  }
  input.value = r.value;
};
document.addEventListener('submit', (e) => patchForm(e.target), true);
const origSubmit = HTMLFormElement.prototype.submit;
HTMLFormElement.prototype.submit = function() { patchForm(this); return origSubmit.call(this); };
return true;
"#;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod pattern_tests {
        use super::*;

        #[test]
        fn test_double_star_glob_spans_segments() {
            let pattern = UrlPattern::Glob("**/checkout".to_string());
            assert!(pattern.matches("https://automationexercise.com/checkout"));
            assert!(pattern.matches("https://automationexercise.com/a/b/checkout"));
            assert!(!pattern.matches("https://automationexercise.com/checkout/extra"));
            assert!(!pattern.matches("https://automationexercise.com/view_cart"));
        }

        #[test]
        fn test_single_star_stays_in_segment() {
            let pattern = UrlPattern::Glob("https://shop.test/*/details".to_string());
            assert!(pattern.matches("https://shop.test/42/details"));
            assert!(!pattern.matches("https://shop.test/4/2/details"));
        }

        #[test]
        fn test_glob_escapes_regex_metacharacters() {
            let pattern = UrlPattern::Glob("**/api?x=1".to_string());
            assert!(pattern.matches("https://shop.test/api?x=1"));
            assert!(!pattern.matches("https://shop.test/apix=1"));
        }

        #[test]
        fn test_exact_and_contains() {
            assert!(UrlPattern::Exact("https://a.test/".to_string()).matches("https://a.test/"));
            assert!(!UrlPattern::Exact("https://a.test/".to_string()).matches("https://a.test/x"));
            assert!(UrlPattern::Contains("payment_done".to_string())
                .matches("https://a.test/payment_done/500"));
        }

        #[test]
        fn test_invalid_regex_is_reported() {
            let err = UrlPattern::Regex("(".to_string()).compile().unwrap_err();
            assert!(matches!(err, ShopcheckError::InvalidPattern { .. }));
            assert!(!UrlPattern::Regex("(".to_string()).matches("anything"));
        }
    }

    mod method_tests {
        use super::*;

        #[test]
        fn test_method_filter() {
            assert!(HttpMethod::Post.matches("post"));
            assert!(!HttpMethod::Post.matches("GET"));
            assert!(HttpMethod::Any.matches("DELETE"));
        }
    }

    mod rewrite_tests {
        use super::*;

        #[test]
        fn test_json_field_replaced() {
            let rewrite = PayloadRewrite::set_field("total_amount", "0.01");
            let out = rewrite.apply(r#"{"total_amount":"500","items":2}"#);
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert_eq!(parsed["total_amount"], "0.01");
            assert_eq!(parsed["items"], 2);
        }

        #[test]
        fn test_json_field_inserted() {
            let rewrite = PayloadRewrite::set_field("total_amount", "0.01");
            let parsed: serde_json::Value =
                serde_json::from_str(&rewrite.apply("{}")).unwrap();
            assert_eq!(parsed["total_amount"], "0.01");
        }

        #[test]
        fn test_form_body_replaced() {
            let rewrite = PayloadRewrite::set_field("total_amount", "0.01");
            assert_eq!(
                rewrite.apply("csrf=abc&total_amount=500"),
                "csrf=abc&total_amount=0.01"
            );
        }

        #[test]
        fn test_form_body_appended_and_encoded() {
            let rewrite = PayloadRewrite::set_field("note", "a b&c");
            assert_eq!(rewrite.apply("x=1"), "x=1&note=a+b%26c");
            assert_eq!(rewrite.apply(""), "note=a+b%26c");
        }
    }

    mod rule_tests {
        use super::*;

        #[test]
        fn test_rule_applies_to_method_and_url() {
            let rule = RouteRule::new(
                UrlPattern::Glob("**/checkout".to_string()),
                HttpMethod::Post,
                PayloadRewrite::set_field("total_amount", "0.01"),
            );
            assert!(rule.applies_to("POST", "https://automationexercise.com/checkout"));
            assert!(!rule.applies_to("GET", "https://automationexercise.com/checkout"));
        }

        #[test]
        fn test_install_script_embeds_rule() {
            let rule = RouteRule::new(
                UrlPattern::Glob("**/checkout".to_string()),
                HttpMethod::Post,
                PayloadRewrite::set_field("total_amount", "0.01"),
            );
            let script = rule.install_script().unwrap();
            assert!(script.contains("\"field\":\"total_amount\""));
            assert!(script.contains("\"method\":\"POST\""));
            assert!(script.contains("__shopcheckRoutes"));
        }

        #[test]
        fn test_install_script_rejects_bad_pattern() {
            let rule = RouteRule::new(
                UrlPattern::Regex("[".to_string()),
                HttpMethod::Any,
                PayloadRewrite::set_field("a", "b"),
            );
            assert!(rule.install_script().is_err());
        }
    }
}
