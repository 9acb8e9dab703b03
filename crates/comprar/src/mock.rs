//! Scripted in-memory storefront.
//!
//! [`MockStorefront`] implements [`Driver`] over an in-memory model of the
//! two demo applications, reproducing the observable behavior the
//! components depend on: the app-rendered bad-credentials error, the
//! native email typeMismatch message, the stepwise required-field order of
//! the shipping form (phone, then street, then city, then country), the
//! duplicate-add alert, hidden duplicate cart badges, and the two-fragment
//! order confirmation. The integration suite runs against it hermetically;
//! the real site is only needed when the `browser` feature drives the CDP
//! driver.
//!
//! The model deliberately answers only the selector candidates the real
//! markup would: at least one element (the login submit button) resolves
//! through a non-first candidate, keeping the fallback chains honest.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::SuiteConfig;
use crate::dialog::{Dialog, DialogAction, DialogHandler};
use crate::driver::{Driver, ElementId, FilePayload};
use crate::locator::Selector;
use crate::result::{ComprarError, ComprarResult};
use crate::session::{Cookie, SessionSnapshot};

/// Message the demo site raises when a product is added twice
pub const DUPLICATE_ADD_MESSAGE: &str = "Product already added to the cart";

/// Bad-credentials error rendered by the login form
pub const BAD_CREDENTIALS_MESSAGE: &str =
    "Bad credentials! Please try again! Make sure that you've registered.";

/// Native message for an empty required input
pub const REQUIRED_FIELD_MESSAGE: &str = "Please fill out this field.";

/// Native message for an unselected required dropdown
pub const REQUIRED_SELECT_MESSAGE: &str = "Please select an item in the list.";

const ADMIN_EMAIL: &str = "admin@admin.com";
const ADMIN_PASSWORD: &str = "admin123";

const PRODUCTS: &[(&str, f64)] = &[
    ("iPhone", 900.00),
    ("Samsung", 800.00),
    ("Nokia", 650.00),
    ("Xiaomi", 500.00),
    ("Huawei", 400.00),
];

const COUNTRY_OPTIONS: &[&str] = &[
    "United States of America",
    "Canada",
    "United Kingdom",
    "Australia",
    "Germany",
    "France",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Blank,
    Login,
    Shop,
    FileUpload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShippingField {
    Phone,
    Street,
    City,
    Country,
}

#[derive(Debug, Default)]
struct State {
    page: PageKind,
    // login form
    email_value: String,
    password_value: String,
    login_error_visible: bool,
    logged_in: bool,
    // shop
    cart: Vec<usize>,
    checkout_open: bool,
    // shipping form
    phone_value: String,
    street_value: String,
    city_value: String,
    country_value: String,
    order_confirmed: bool,
    confirmed_amount: f64,
    confirmed_info: String,
    // file upload
    attached_files: Vec<String>,
    upload_succeeded: bool,
    // session
    cookies: Vec<Cookie>,
    // an unhandled dialog blocks everything that follows
    blocking_dialog: Option<Dialog>,
}

impl Default for PageKind {
    fn default() -> Self {
        Self::Blank
    }
}

impl State {
    fn reset_page_state(&mut self) {
        self.email_value.clear();
        self.password_value.clear();
        self.login_error_visible = false;
        self.checkout_open = false;
        self.phone_value.clear();
        self.street_value.clear();
        self.city_value.clear();
        self.country_value.clear();
        self.order_confirmed = false;
        self.attached_files.clear();
        self.upload_succeeded = false;
    }

    fn has_auth_cookie(&self) -> bool {
        self.cookies.iter().any(|c| c.name == "auth")
    }

    /// The native validation message the email input would report
    fn email_validation_message(&self) -> String {
        if !self.email_value.is_empty() && !self.email_value.contains('@') {
            format!(
                "Please include an '@' in the email address. '{}' is missing an '@'.",
                self.email_value
            )
        } else {
            String::new()
        }
    }

    /// First unmet shipping requirement, in strict field order
    fn blocking_shipping_field(&self) -> Option<ShippingField> {
        if self.phone_value.is_empty() {
            Some(ShippingField::Phone)
        } else if self.street_value.is_empty() {
            Some(ShippingField::Street)
        } else if self.city_value.is_empty() {
            Some(ShippingField::City)
        } else if self.country_value.is_empty() {
            Some(ShippingField::Country)
        } else {
            None
        }
    }

    fn cart_total(&self) -> f64 {
        self.cart.iter().map(|&i| PRODUCTS[i].1).sum()
    }
}

/// In-memory scripted implementation of the browser-automation host
#[derive(Debug, Clone)]
pub struct MockStorefront {
    ecommerce_url: String,
    file_upload_url: String,
    state: Arc<Mutex<State>>,
    dialogs: DialogHandler,
    login_round_trips: Arc<AtomicUsize>,
}

impl MockStorefront {
    /// Create a storefront answering the URLs in the given config
    #[must_use]
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            ecommerce_url: config.ecommerce_url(),
            file_upload_url: config.file_upload_url(),
            state: Arc::new(Mutex::new(State::default())),
            dialogs: DialogHandler::new(),
            login_round_trips: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many full login round trips the application has served.
    ///
    /// Lets tests prove that session restoration skipped the form.
    #[must_use]
    pub fn login_round_trips(&self) -> usize {
        self.login_round_trips.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("storefront state poisoned")
    }

    fn guard_queue(&self, state: &State) -> ComprarResult<()> {
        if let Some(ref dialog) = state.blocking_dialog {
            return Err(ComprarError::DialogBlocked {
                dialog_type: dialog.dialog_type().to_string(),
                message: dialog.message().to_string(),
            });
        }
        Ok(())
    }

    /// Element ids present in the current render, in document order
    fn dom(state: &State) -> Vec<&'static str> {
        let mut ids = vec!["body"];
        match state.page {
            PageKind::Blank => {}
            PageKind::Login => {
                ids.extend(["email", "password", "login-submit"]);
                if state.login_error_visible {
                    ids.push("login-error");
                }
            }
            PageKind::Shop => {
                for index in 0..PRODUCTS.len() {
                    ids.push(shop_item_id(index));
                }
                // the badge renders a hidden duplicate before the visible one
                ids.extend([
                    "cart-qty-hidden",
                    "cart-qty-visible",
                    "cart-items",
                    "cart-total",
                    "cart-button",
                    "checkout-btn",
                    "logout",
                ]);
                if state.checkout_open {
                    ids.extend([
                        "shipping-form",
                        "phone",
                        "street",
                        "city",
                        "country",
                        "order-submit",
                    ]);
                }
                if state.order_confirmed {
                    ids.extend(["confirm-msg", "confirm-amount", "confirm-info"]);
                }
            }
            PageKind::FileUpload => {
                ids.extend(["file-input", "file-submit"]);
                if state.upload_succeeded {
                    ids.push("file-success");
                }
            }
        }
        ids
    }

    /// CSS candidates each element answers to. Deliberately mirrors the
    /// assumed target markup, including elements that only answer a
    /// fallback candidate.
    fn css_matchers(id: &str) -> &'static [&'static str] {
        match id {
            "body" => &["body"],
            "email" => &["#email"],
            "password" => &["#password"],
            // no #submitLoginBtn in this markup revision: the button is
            // only reachable through the text-filtered fallback
            "login-submit" => &[],
            "login-error" => &[".error-message", "[role='alert']"],
            "cart-qty-hidden" | "cart-qty-visible" => &[".cart-quantity"],
            "cart-items" => &[".cart-items"],
            "cart-total" => &[".cart-total-price"],
            "cart-button" => &["[data-qa='cart']"],
            "checkout-btn" => &[".btn-purchase"],
            "logout" => &["[data-qa='logout']"],
            "shipping-form" => &["#shippingForm", "form"],
            "phone" => &["#phone", "[type='tel']"],
            "street" => &["input[name='street']"],
            "city" => &["input[name='city']"],
            "country" => &["#countries_dropdown_menu", "select"],
            "order-submit" => &["#submitOrderBtn"],
            "confirm-msg" => &["#message"],
            "confirm-amount" => &["#message b:nth-of-type(1)"],
            "confirm-info" => &["#message b:nth-of-type(2)"],
            "file-input" => &["input[type='file']"],
            "file-submit" => &["button[type='submit']"],
            "file-success" => &[".success-message"],
            _ => &[],
        }
    }

    fn element_text(state: &State, id: &str) -> String {
        if let Some(index) = parse_shop_item(id) {
            let (name, price) = PRODUCTS[index];
            return if id.ends_with("-title") {
                name.to_string()
            } else if id.ends_with("-price") {
                format!("${price:.2}")
            } else if id.ends_with("-button") {
                "Add to cart".to_string()
            } else {
                format!("{name} ${price:.2} Add to cart")
            };
        }
        match id {
            "login-submit" => "Login".to_string(),
            "login-error" => {
                if state.login_error_visible {
                    BAD_CREDENTIALS_MESSAGE.to_string()
                } else {
                    String::new()
                }
            }
            "cart-qty-hidden" | "cart-qty-visible" => format!("{} items", state.cart.len()),
            "cart-total" => format!("${:.2}", state.cart_total()),
            "checkout-btn" => "Proceed to checkout".to_string(),
            "logout" => "Log out".to_string(),
            "order-submit" => "Submit order".to_string(),
            "confirm-msg" => format!(
                "Thank you for your order! Amount: ${:.2}. \
                 Your order will be delivered to {}",
                state.confirmed_amount, state.confirmed_info
            ),
            "confirm-amount" => format!("${:.2}", state.confirmed_amount),
            // trailing period is part of the rendered sentence
            "confirm-info" => state.confirmed_info.clone(),
            "file-submit" => "Submit".to_string(),
            "file-success" => "Successfully uploaded".to_string(),
            _ => String::new(),
        }
    }

    fn element_visible(state: &State, id: &str) -> bool {
        match id {
            "cart-qty-hidden" => false,
            "login-error" => state.login_error_visible,
            "confirm-msg" | "confirm-amount" | "confirm-info" => state.order_confirmed,
            "file-success" => state.upload_succeeded,
            _ => Self::dom(state).iter().any(|d| *d == id) || parse_shop_item(id).is_some(),
        }
    }

    fn matches(state: &State, id: &str, selector: &Selector) -> bool {
        let css_list: Vec<&str> = if let Some(_index) = parse_shop_item(id) {
            if id.ends_with("-title") {
                vec![".shop-item-title"]
            } else if id.ends_with("-button") {
                vec![".shop-item-button"]
            } else if id.ends_with("-price") {
                vec![".shop-item-price"]
            } else {
                vec![".shop-item"]
            }
        } else {
            Self::css_matchers(id).to_vec()
        };

        match selector {
            Selector::Css(css) => css_list.contains(&css.as_str()),
            Selector::CssWithText { css, text } => {
                let structural = match id {
                    "login-submit" => css == "button[type='submit']",
                    _ => css_list.contains(&css.as_str()),
                };
                structural && Self::element_text(state, id).contains(text.as_str())
            }
        }
    }

    fn submit_login(&self, state: &mut State) {
        // native constraint validation blocks the submission entirely
        if !state.email_validation_message().is_empty() {
            return;
        }
        self.login_round_trips.fetch_add(1, Ordering::SeqCst);
        if state.email_value == ADMIN_EMAIL && state.password_value == ADMIN_PASSWORD {
            state.logged_in = true;
            state.login_error_visible = false;
            state.cookies.push(Cookie::new("auth", "session-token", "mock.storefront"));
            state.page = PageKind::Shop;
            state.reset_page_state();
        } else {
            state.login_error_visible = true;
        }
    }

    fn add_to_cart(&self, state: &mut State, index: usize) {
        if state.cart.contains(&index) {
            let handled = self.dialogs.handle(Dialog::alert(DUPLICATE_ADD_MESSAGE));
            if handled.action() == DialogAction::Pending {
                state.blocking_dialog = Some(handled);
            }
            return;
        }
        state.cart.push(index);
    }

    fn submit_order(&self, state: &mut State) {
        // native validation surfaces the first unmet requirement only
        if state.blocking_shipping_field().is_some() {
            return;
        }
        state.order_confirmed = true;
        state.confirmed_amount = state.cart_total();
        state.confirmed_info = format!(
            "{}, {} - {}.",
            state.street_value, state.city_value, state.country_value
        );
    }
}

fn shop_item_id(index: usize) -> &'static str {
    // fixed ids keep handles stable across polls
    const IDS: &[&str] = &["shop-item-0", "shop-item-1", "shop-item-2", "shop-item-3", "shop-item-4"];
    IDS[index]
}

fn parse_shop_item(id: &str) -> Option<usize> {
    let rest = id.strip_prefix("shop-item-")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[async_trait]
impl Driver for MockStorefront {
    async fn visit(&self, url: &str) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        state.reset_page_state();
        if url == self.ecommerce_url {
            state.logged_in = state.has_auth_cookie();
            state.page = if state.logged_in {
                PageKind::Shop
            } else {
                PageKind::Login
            };
        } else if url == self.file_upload_url {
            state.page = PageKind::FileUpload;
        } else {
            return Err(ComprarError::NavigationError {
                url: url.to_string(),
                message: "unknown route".to_string(),
            });
        }
        Ok(())
    }

    async fn current_url(&self) -> ComprarResult<String> {
        let state = self.lock();
        Ok(match state.page {
            PageKind::Blank => "about:blank".to_string(),
            PageKind::Login | PageKind::Shop => self.ecommerce_url.clone(),
            PageKind::FileUpload => self.file_upload_url.clone(),
        })
    }

    async fn reload(&self) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        state.reset_page_state();
        Ok(())
    }

    async fn find(&self, selector: &Selector) -> ComprarResult<Vec<ElementId>> {
        let state = self.lock();
        self.guard_queue(&state)?;
        let ids = Self::dom(&state)
            .into_iter()
            .filter(|id| Self::matches(&state, id, selector))
            .map(ElementId::new)
            .collect();
        Ok(ids)
    }

    async fn find_within(
        &self,
        parent: &ElementId,
        selector: &Selector,
    ) -> ComprarResult<Vec<ElementId>> {
        let state = self.lock();
        self.guard_queue(&state)?;
        let Some(index) = parse_shop_item(parent.as_str()) else {
            return Ok(Vec::new());
        };
        let children = [
            format!("shop-item-{index}-title"),
            format!("shop-item-{index}-price"),
            format!("shop-item-{index}-button"),
        ];
        Ok(children
            .into_iter()
            .filter(|id| Self::matches(&state, id, selector))
            .map(ElementId::new)
            .collect())
    }

    async fn click(&self, element: &ElementId) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        let id = element.as_str();
        if let Some(index) = parse_shop_item(id) {
            if id.ends_with("-button") {
                self.add_to_cart(&mut state, index);
            }
            return Ok(());
        }
        match id {
            "login-submit" => self.submit_login(&mut state),
            "checkout-btn" => state.checkout_open = true,
            "logout" => {
                state.logged_in = false;
                state.cookies.retain(|c| c.name != "auth");
                state.cart.clear();
                state.page = PageKind::Login;
                state.reset_page_state();
            }
            "order-submit" => self.submit_order(&mut state),
            "file-submit" => {
                if !state.attached_files.is_empty() {
                    state.upload_succeeded = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn type_text(&self, element: &ElementId, text: &str) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        let field = match element.as_str() {
            "email" => &mut state.email_value,
            "password" => &mut state.password_value,
            "phone" => &mut state.phone_value,
            "street" => &mut state.street_value,
            "city" => &mut state.city_value,
            other => {
                return Err(ComprarError::InputError {
                    element: other.to_string(),
                    message: "not a text input".to_string(),
                })
            }
        };
        field.push_str(text);
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        match element.as_str() {
            "email" => state.email_value.clear(),
            "password" => state.password_value.clear(),
            "phone" => state.phone_value.clear(),
            "street" => state.street_value.clear(),
            "city" => state.city_value.clear(),
            _ => {}
        }
        Ok(())
    }

    async fn select_option(&self, element: &ElementId, label: &str) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        if element.as_str() != "country" {
            return Err(ComprarError::InputError {
                element: element.to_string(),
                message: "not a select".to_string(),
            });
        }
        if COUNTRY_OPTIONS.contains(&label) {
            state.country_value = label.to_string();
            Ok(())
        } else {
            Err(ComprarError::InputError {
                element: element.to_string(),
                message: format!("no option labelled {label:?}"),
            })
        }
    }

    async fn scroll_into_view(&self, _element: &ElementId) -> ComprarResult<()> {
        let state = self.lock();
        self.guard_queue(&state)?;
        Ok(())
    }

    async fn is_visible(&self, element: &ElementId) -> ComprarResult<bool> {
        let state = self.lock();
        Ok(Self::element_visible(&state, element.as_str()))
    }

    async fn is_enabled(&self, _element: &ElementId) -> ComprarResult<bool> {
        Ok(true)
    }

    async fn text(&self, element: &ElementId) -> ComprarResult<String> {
        let state = self.lock();
        Ok(Self::element_text(&state, element.as_str()))
    }

    async fn validation_message(&self, element: &ElementId) -> ComprarResult<String> {
        let state = self.lock();
        let message = match element.as_str() {
            "email" => state.email_validation_message(),
            "phone" if state.blocking_shipping_field() == Some(ShippingField::Phone) => {
                REQUIRED_FIELD_MESSAGE.to_string()
            }
            "street" if state.blocking_shipping_field() == Some(ShippingField::Street) => {
                REQUIRED_FIELD_MESSAGE.to_string()
            }
            "city" if state.blocking_shipping_field() == Some(ShippingField::City) => {
                REQUIRED_FIELD_MESSAGE.to_string()
            }
            "country" if state.blocking_shipping_field() == Some(ShippingField::Country) => {
                REQUIRED_SELECT_MESSAGE.to_string()
            }
            _ => String::new(),
        };
        Ok(message)
    }

    async fn attach_files(
        &self,
        element: &ElementId,
        files: &[FilePayload],
    ) -> ComprarResult<()> {
        let mut state = self.lock();
        self.guard_queue(&state)?;
        if element.as_str() != "file-input" {
            return Err(ComprarError::InputError {
                element: element.to_string(),
                message: "not a file input".to_string(),
            });
        }
        state.attached_files = files.iter().map(|f| f.name.clone()).collect();
        Ok(())
    }

    async fn attached_file_names(&self, element: &ElementId) -> ComprarResult<Vec<String>> {
        let state = self.lock();
        if element.as_str() != "file-input" {
            return Ok(Vec::new());
        }
        Ok(state.attached_files.clone())
    }

    async fn clear_session_state(&self) -> ComprarResult<()> {
        let mut state = self.lock();
        state.cookies.clear();
        state.logged_in = false;
        state.cart.clear();
        state.blocking_dialog = None;
        state.reset_page_state();
        state.page = PageKind::Blank;
        Ok(())
    }

    async fn snapshot_session(&self) -> ComprarResult<SessionSnapshot> {
        let state = self.lock();
        let mut snapshot = SessionSnapshot::new();
        snapshot.cookies = state.cookies.clone();
        Ok(snapshot)
    }

    async fn restore_session(&self, snapshot: &SessionSnapshot) -> ComprarResult<()> {
        let mut state = self.lock();
        state.cookies = snapshot.cookies.clone();
        Ok(())
    }

    fn dialogs(&self) -> DialogHandler {
        self.dialogs.clone()
    }
}
