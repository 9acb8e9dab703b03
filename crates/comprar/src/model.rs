//! Domain value objects shared by components, pages and tests.
//!
//! Everything here is a transient, per-test value. There is no persistence
//! layer; cart state in particular is never modelled locally: the suite
//! only reads and reconciles the totals the application renders.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Advisory user role; carried as metadata only, never enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator account
    Admin,
    /// Customer account
    Customer,
}

/// Login credentials.
///
/// The email must be non-empty for any real login attempt; empty values
/// are only used deliberately, to exercise native required-field
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Advisory role metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Credentials {
    /// Create credentials from email and password
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    /// Attach an advisory role
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// How a login is specified at the call boundary.
///
/// Resolved once into concrete email/password; components never dispatch
/// on argument shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    /// A full user record
    User(Credentials),
    /// Bare email and password
    EmailPassword(String, String),
}

impl LoginIdentity {
    /// Resolve to (email, password)
    #[must_use]
    pub fn resolve(&self) -> (&str, &str) {
        match self {
            Self::User(user) => (&user.email, &user.password),
            Self::EmailPassword(email, password) => (email, password),
        }
    }

    /// Cache key for session reuse, derived from the identity
    #[must_use]
    pub fn session_key(&self) -> String {
        self.resolve().0.to_string()
    }
}

impl From<Credentials> for LoginIdentity {
    fn from(user: Credentials) -> Self {
        Self::User(user)
    }
}

/// Default phone applied when a partial address omits it
pub const DEFAULT_PHONE: &str = "1234567890";
/// Default street applied when a partial address omits it
pub const DEFAULT_STREET: &str = "123 Test Street";
/// Default city applied when a partial address omits it
pub const DEFAULT_CITY: &str = "Test City";
/// Default country applied when a partial address omits it
pub const DEFAULT_COUNTRY: &str = "United States of America";

/// A shipping address.
///
/// The four core fields (phone, street, city, country) are all required
/// for a successful submission; the form surfaces the first missing one
/// in field order. Optional fields are accepted but not validated by the
/// target application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street address
    pub street: String,
    /// City
    pub city: String,
    /// Country, as listed in the dropdown
    pub country: String,
    /// Phone number
    pub phone: String,
    /// Postal code (unused by the target form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// State (unused by the target form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            street: DEFAULT_STREET.to_string(),
            city: DEFAULT_CITY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: DEFAULT_PHONE.to_string(),
            postal_code: None,
            state: None,
        }
    }
}

impl ShippingAddress {
    /// Build an address from the four core fields
    #[must_use]
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            country: country.into(),
            phone: phone.into(),
            postal_code: None,
            state: None,
        }
    }

    /// Partial address builder: start from defaults, override fields.
    ///
    /// Lets a test that only cares about, say, the city keep the rest of
    /// the form submittable.
    #[must_use]
    pub fn partial() -> Self {
        Self::default()
    }

    /// Override the street
    #[must_use]
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    /// Override the city
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Override the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Override the phone
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// The exact line the confirmation message must carry for this
    /// address: `"{street}, {city} - {country}"`.
    #[must_use]
    pub fn confirmation_line(&self) -> String {
        format!("{}, {} - {}", self.street, self.city, self.country)
    }
}

/// How a product is picked from the rendered list.
///
/// Products carry no stable IDs; resolution happens at interaction time
/// by scanning rendered text or position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductPick {
    /// By exact or substring name match; first match wins
    ByName(String),
    /// By ordinal position in rendered order
    ByIndex(usize),
    /// The first N entries in rendered order
    FirstN(usize),
}

impl From<&str> for ProductPick {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_string())
    }
}

impl From<usize> for ProductPick {
    fn from(index: usize) -> Self {
        Self::ByIndex(index)
    }
}

/// Expected text: literal substring containment or a regex pattern
#[derive(Debug, Clone)]
pub enum TextExpectation {
    /// Substring containment
    Literal(String),
    /// Regex match
    Pattern(Regex),
}

impl TextExpectation {
    /// Literal substring expectation
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Regex pattern expectation.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not a valid regex; expectations are
    /// authored as literals in test code.
    #[must_use]
    pub fn pattern(pattern: &str) -> Self {
        Self::Pattern(Regex::new(pattern).expect("invalid expectation pattern"))
    }

    /// Check the expectation against actual text
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Literal(expected) => actual.contains(expected.as_str()),
            Self::Pattern(regex) => regex.is_match(actual),
        }
    }
}

impl std::fmt::Display for TextExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "text containing {text:?}"),
            Self::Pattern(regex) => write!(f, "text matching /{}/", regex.as_str()),
        }
    }
}

/// Parse localized currency text into a numeric price
/// (e.g. `"$1,099.99"` → `1099.99`).
///
/// Returns `None` when the text carries no parseable number.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

/// Parse a count out of badge text (e.g. `"3 items"` → `3`).
///
/// Returns 0 when no digits are present, matching an empty badge.
#[must_use]
pub fn parse_count(text: &str) -> usize {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Strip a single trailing period, the way the confirmation message is
/// normalized before comparison.
#[must_use]
pub fn strip_trailing_period(text: &str) -> &str {
    text.trim().trim_end_matches('.')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod identity_tests {
        use super::*;

        #[test]
        fn test_resolve_from_user() {
            let identity = LoginIdentity::User(
                Credentials::new("admin@admin.com", "admin123").with_role(Role::Admin),
            );
            assert_eq!(identity.resolve(), ("admin@admin.com", "admin123"));
            assert_eq!(identity.session_key(), "admin@admin.com");
        }

        #[test]
        fn test_resolve_from_email_password() {
            let identity =
                LoginIdentity::EmailPassword("a@b.com".to_string(), "pw".to_string());
            assert_eq!(identity.resolve(), ("a@b.com", "pw"));
        }
    }

    mod address_tests {
        use super::*;

        #[test]
        fn test_defaults_fill_omitted_fields() {
            let address = ShippingAddress::partial().with_city("Lyon");
            assert_eq!(address.city, "Lyon");
            assert_eq!(address.phone, DEFAULT_PHONE);
            assert_eq!(address.street, DEFAULT_STREET);
            assert_eq!(address.country, DEFAULT_COUNTRY);
        }

        #[test]
        fn test_confirmation_line() {
            let address = ShippingAddress::new(
                "123 Test St",
                "Test City",
                "United States of America",
                "123-456-7890",
            );
            assert_eq!(
                address.confirmation_line(),
                "123 Test St, Test City - United States of America"
            );
        }
    }

    mod expectation_tests {
        use super::*;

        #[test]
        fn test_literal_is_substring_containment() {
            let expectation = TextExpectation::literal("Bad credentials");
            assert!(expectation.matches("Bad credentials! Please try again!"));
            assert!(!expectation.matches("bad credentials"));
        }

        #[test]
        fn test_pattern() {
            let expectation = TextExpectation::pattern(r"(?i)missing an '@'");
            assert!(expectation.matches("The address is Missing an '@' symbol"));
            assert!(!expectation.matches("looks fine"));
        }
    }

    mod parsing_tests {
        use super::*;

        #[test]
        fn test_parse_price() {
            assert_eq!(parse_price("$19.99"), Some(19.99));
            assert_eq!(parse_price(" $1,099.50 "), Some(1099.50));
            assert_eq!(parse_price("900.00"), Some(900.00));
            assert_eq!(parse_price("free"), None);
        }

        #[test]
        fn test_parse_count() {
            assert_eq!(parse_count("3 items"), 3);
            assert_eq!(parse_count("Cart (12)"), 12);
            assert_eq!(parse_count(""), 0);
        }

        #[test]
        fn test_strip_trailing_period() {
            assert_eq!(
                strip_trailing_period("123 Test St, Test City - USA."),
                "123 Test St, Test City - USA"
            );
            assert_eq!(strip_trailing_period("no period"), "no period");
        }
    }
}
