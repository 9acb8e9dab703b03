//! Centralized selector registry for the target applications.
//!
//! Every element the components touch is registered here under a semantic
//! name, with an ordered fallback chain of structural queries. Candidate
//! lists are versioned configuration authored against the demo site's
//! markup as observed in 2024; they are not a guaranteed contract. If the
//! target markup changes, resolution may pick an unintended element;
//! review the chains here first when a test starts failing structurally.
//!
//! Candidate strategy, in priority order: unique IDs and data attributes,
//! ARIA attributes, CSS attribute selectors, text-filtered queries,
//! position-based selectors as a last resort.

use std::collections::HashMap;

use crate::locator::{Selector, SelectorChain};

/// Semantic names for login form elements
pub mod login {
    /// Email input
    pub const EMAIL_FIELD: &str = "login email field";
    /// Password input
    pub const PASSWORD_FIELD: &str = "login password field";
    /// Submit control
    pub const SUBMIT_BUTTON: &str = "login submit button";
    /// Application-rendered error element
    pub const ERROR_MESSAGE: &str = "login error message";
}

/// Semantic names for e-commerce page elements
pub mod ecommerce {
    /// A rendered product entry
    pub const SHOP_ITEM: &str = "shop item";
    /// Product title within an entry
    pub const SHOP_ITEM_TITLE: &str = "shop item title";
    /// Add-to-cart control within an entry
    pub const SHOP_ITEM_BUTTON: &str = "shop item button";
    /// Product price within an entry
    pub const SHOP_ITEM_PRICE: &str = "shop item price";
    /// Cart items container
    pub const CART_ITEMS: &str = "cart items";
    /// Cart count badge
    pub const CART_QUANTITY: &str = "cart quantity badge";
    /// Displayed cart total
    pub const CART_TOTAL: &str = "cart total";
    /// Cart button/link
    pub const CART_BUTTON: &str = "cart button";
    /// Checkout (purchase) control
    pub const CHECKOUT_BUTTON: &str = "checkout button";
    /// Logout control
    pub const LOGOUT_BUTTON: &str = "logout button";
}

/// Semantic names for the order confirmation message
pub mod order_confirmation {
    /// Confirmation container
    pub const CONTAINER: &str = "order confirmation";
    /// First bolded fragment (order amount)
    pub const AMOUNT_BOLD: &str = "order confirmation amount";
    /// Second bolded fragment (shipping info)
    pub const INFO_BOLD: &str = "order confirmation info";
}

/// Semantic names for shipping form elements
pub mod shipping {
    /// The shipping form
    pub const FORM: &str = "shipping form";
    /// Phone input
    pub const PHONE_FIELD: &str = "shipping phone field";
    /// Street input
    pub const STREET_FIELD: &str = "shipping street field";
    /// City input
    pub const CITY_FIELD: &str = "shipping city field";
    /// Country dropdown
    pub const COUNTRY_DROPDOWN: &str = "shipping country dropdown";
    /// Submit order control
    pub const SUBMIT_ORDER_BUTTON: &str = "shipping submit order button";
}

/// Semantic names for file upload page elements
pub mod file_upload {
    /// File input
    pub const FILE_INPUT: &str = "file upload input";
    /// Submit control
    pub const SUBMIT_BUTTON: &str = "file upload submit button";
    /// Success message
    pub const SUCCESS_MESSAGE: &str = "file upload success message";
}

/// Semantic names for common UI elements
pub mod common {
    /// Page body
    pub const BODY: &str = "page body";
    /// Generic error message
    pub const ERROR_MESSAGE: &str = "error message";
    /// Generic success message
    pub const SUCCESS_MESSAGE: &str = "success message";
}

/// Registry mapping semantic element names to fallback chains.
///
/// The registry itself never errors: an unknown name returns `None`, and a
/// chain that resolves nothing surfaces later as a timeout at the call
/// site that needed the element.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    chains: HashMap<&'static str, SelectorChain>,
}

impl SelectorRegistry {
    /// Build the registry for the demo storefront and file-upload pages
    #[must_use]
    pub fn standard() -> Self {
        let mut chains = HashMap::new();
        let mut add = |name: &'static str, candidates: Vec<Selector>| {
            let _ = chains.insert(name, SelectorChain::new(name, candidates));
        };

        add(login::EMAIL_FIELD, vec![Selector::css("#email")]);
        add(login::PASSWORD_FIELD, vec![Selector::css("#password")]);
        add(
            login::SUBMIT_BUTTON,
            vec![
                Selector::css("#submitLoginBtn"),
                Selector::css_with_text("button[type='submit']", "Login"),
                Selector::css_with_text("button[type='submit']", "Sign In"),
            ],
        );
        add(
            login::ERROR_MESSAGE,
            vec![
                Selector::css(".error-message"),
                Selector::css(".alert-danger"),
                Selector::css("[role='alert']"),
            ],
        );

        add(ecommerce::SHOP_ITEM, vec![Selector::css(".shop-item")]);
        add(
            ecommerce::SHOP_ITEM_TITLE,
            vec![Selector::css(".shop-item-title")],
        );
        add(
            ecommerce::SHOP_ITEM_BUTTON,
            vec![Selector::css(".shop-item-button")],
        );
        add(
            ecommerce::SHOP_ITEM_PRICE,
            vec![Selector::css(".shop-item-price"), Selector::css(".price")],
        );
        add(ecommerce::CART_ITEMS, vec![Selector::css(".cart-items")]);
        add(
            ecommerce::CART_QUANTITY,
            vec![Selector::css(".cart-quantity")],
        );
        add(
            ecommerce::CART_TOTAL,
            vec![Selector::css(".cart-total-price")],
        );
        add(
            ecommerce::CART_BUTTON,
            vec![
                Selector::css("[data-qa='cart']"),
                Selector::css(".cart-icon"),
                Selector::css("#cart-button"),
            ],
        );
        add(
            ecommerce::CHECKOUT_BUTTON,
            vec![Selector::css(".btn-purchase")],
        );
        add(
            ecommerce::LOGOUT_BUTTON,
            vec![
                Selector::css("[data-qa='logout']"),
                Selector::css(".logout-button"),
                Selector::css("#logout"),
            ],
        );

        add(
            order_confirmation::CONTAINER,
            vec![
                Selector::css("#message"),
                Selector::css("[data-qa='order-confirmation']"),
                Selector::css(".order-confirmation"),
            ],
        );
        add(
            order_confirmation::AMOUNT_BOLD,
            vec![Selector::css("#message b:nth-of-type(1)")],
        );
        add(
            order_confirmation::INFO_BOLD,
            vec![Selector::css("#message b:nth-of-type(2)")],
        );

        add(
            shipping::FORM,
            vec![
                Selector::css("#shippingForm"),
                Selector::css("form[class*='shipping']"),
                Selector::css("form[class*='checkout']"),
                Selector::css("form"),
            ],
        );
        add(
            shipping::PHONE_FIELD,
            vec![
                Selector::css("#phone"),
                Selector::css("[name='phone']"),
                Selector::css("[type='tel']"),
                Selector::css("input[placeholder*='phone']"),
            ],
        );
        add(
            shipping::STREET_FIELD,
            vec![
                Selector::css("input[name='street']"),
                Selector::css("[name='address']"),
                Selector::css("input[placeholder*='street']"),
                Selector::css("input[placeholder*='address']"),
            ],
        );
        add(
            shipping::CITY_FIELD,
            vec![
                Selector::css("input[name='city']"),
                Selector::css("input[placeholder*='city']"),
            ],
        );
        add(
            shipping::COUNTRY_DROPDOWN,
            vec![
                Selector::css("#countries_dropdown_menu"),
                Selector::css("select[name='country']"),
                Selector::css("select"),
            ],
        );
        add(
            shipping::SUBMIT_ORDER_BUTTON,
            vec![
                Selector::css("#submitOrderBtn"),
                Selector::css("button[class*='order']"),
                Selector::css_with_text("button", "Submit"),
                Selector::css_with_text("button", "Order"),
            ],
        );

        add(
            file_upload::FILE_INPUT,
            vec![
                Selector::css("input[type='file']"),
                Selector::css("[class*='file-input']"),
            ],
        );
        add(
            file_upload::SUBMIT_BUTTON,
            vec![
                Selector::css("button[type='submit']"),
                Selector::css("input[type='submit']"),
                Selector::css_with_text("button", "Upload"),
            ],
        );
        add(
            file_upload::SUCCESS_MESSAGE,
            vec![
                Selector::css(".success-message"),
                Selector::css(".alert-success"),
                Selector::css_with_text("div", "Successfully uploaded"),
            ],
        );

        add(common::BODY, vec![Selector::css("body")]);
        add(
            common::ERROR_MESSAGE,
            vec![
                Selector::css(".error-message"),
                Selector::css(".alert-danger"),
                Selector::css(".validation-error"),
            ],
        );
        add(
            common::SUCCESS_MESSAGE,
            vec![
                Selector::css(".success-message"),
                Selector::css(".order-success"),
                Selector::css(".alert-success"),
            ],
        );

        Self { chains }
    }

    /// Look up a chain by semantic name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SelectorChain> {
        self.chains.get(name)
    }

    /// Look up a chain, panicking on an unregistered name.
    ///
    /// Component code uses this for names it registers itself; an unknown
    /// name there is a programming error, not a runtime condition.
    ///
    /// # Panics
    ///
    /// Panics if the name is not registered.
    #[must_use]
    pub fn chain(&self, name: &str) -> &SelectorChain {
        self.chains
            .get(name)
            .unwrap_or_else(|| panic!("selector name not registered: {name}"))
    }

    /// All registered semantic names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.chains.keys().copied().collect()
    }

    /// Number of registered chains
    #[must_use]
    pub fn count(&self) -> usize {
        self.chains.len()
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chain_has_candidates() {
        let registry = SelectorRegistry::standard();
        for name in registry.names() {
            let chain = registry.get(name).unwrap();
            assert!(!chain.is_empty(), "chain '{name}' has no candidates");
        }
    }

    #[test]
    fn test_lookup_by_semantic_name() {
        let registry = SelectorRegistry::standard();
        let chain = registry.get(login::EMAIL_FIELD).unwrap();
        assert_eq!(chain.candidates()[0], Selector::css("#email"));
        assert!(registry.get("nonexistent element").is_none());
    }

    #[test]
    fn test_submit_button_fallback_order() {
        let registry = SelectorRegistry::standard();
        let chain = registry.chain(login::SUBMIT_BUTTON);
        // ID candidate first, text-filtered fallbacks after
        assert_eq!(chain.candidates()[0], Selector::css("#submitLoginBtn"));
        assert_eq!(
            chain.candidates()[1],
            Selector::css_with_text("button[type='submit']", "Login")
        );
    }

    #[test]
    fn test_shipping_field_order_is_phone_street_city_country() {
        // The stepwise validation protocol depends on these four names all
        // being registered; field order itself is enforced by the form.
        let registry = SelectorRegistry::standard();
        for name in [
            shipping::PHONE_FIELD,
            shipping::STREET_FIELD,
            shipping::CITY_FIELD,
            shipping::COUNTRY_DROPDOWN,
        ] {
            assert!(registry.get(name).is_some());
        }
    }

    #[test]
    #[should_panic(expected = "selector name not registered")]
    fn test_chain_panics_on_unknown_name() {
        let registry = SelectorRegistry::standard();
        let _ = registry.chain("made up");
    }
}
