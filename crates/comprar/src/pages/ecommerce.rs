//! E-commerce page façade.

use futures::future::try_join_all;
use std::sync::Arc;
use tracing::info;

use crate::components::{Checkout, LoginForm, ProductList, ShippingForm};
use crate::config::SuiteConfig;
use crate::data::UserGenerator;
use crate::driver::Driver;
use crate::model::{LoginIdentity, ProductPick, ShippingAddress, TextExpectation};
use crate::pages::Nav;
use crate::result::{ComprarError, ComprarResult};
use crate::selectors::SelectorRegistry;
use crate::session::SessionCache;
use crate::wait::WaitOptions;

/// Façade over the demo shop: login, product list, checkout and shipping
/// composed into full journeys.
#[derive(Clone)]
pub struct EcommercePage {
    driver: Arc<dyn Driver>,
    config: SuiteConfig,
    nav: Nav,
    login_form: LoginForm,
    product_list: ProductList,
    shipping_form: ShippingForm,
    checkout: Checkout,
    sessions: SessionCache,
}

impl std::fmt::Debug for EcommercePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcommercePage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EcommercePage {
    /// Build the page over a driver and suite config
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, config: SuiteConfig) -> Self {
        let registry = Arc::new(SelectorRegistry::standard());
        let options = WaitOptions::new()
            .with_timeout(config.command_timeout_ms)
            .with_poll_interval(config.poll_interval_ms);
        Self {
            nav: Nav::new(Arc::clone(&driver), Arc::clone(&registry), options),
            login_form: LoginForm::new(Arc::clone(&driver), Arc::clone(&registry), options),
            product_list: ProductList::new(Arc::clone(&driver), Arc::clone(&registry), options),
            shipping_form: ShippingForm::new(Arc::clone(&driver), Arc::clone(&registry), options),
            checkout: Checkout::new(Arc::clone(&driver), Arc::clone(&registry), options),
            driver,
            config,
            sessions: SessionCache::new(),
        }
    }

    /// Share a session cache with other pages or tests
    #[must_use]
    pub fn with_session_cache(mut self, sessions: SessionCache) -> Self {
        self.sessions = sessions;
        self
    }

    /// Navigation capability
    #[must_use]
    pub fn nav(&self) -> &Nav {
        &self.nav
    }

    /// Login form component
    #[must_use]
    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    /// Product list component
    #[must_use]
    pub fn product_list(&self) -> &ProductList {
        &self.product_list
    }

    /// Shipping form component
    #[must_use]
    pub fn shipping_form(&self) -> &ShippingForm {
        &self.shipping_form
    }

    /// Checkout component
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Visit the shop and wait until the login form is ready
    pub async fn visit(&self) -> ComprarResult<&Self> {
        self.nav.visit(&self.config.ecommerce_url()).await?;
        self.login_form.wait_for_ready().await?;
        Ok(self)
    }

    /// Log in with the given identity
    pub async fn login(&self, identity: &LoginIdentity) -> ComprarResult<&Self> {
        let (email, password) = identity.resolve();
        self.login_form.login(email, password).await?;
        Ok(self)
    }

    /// Log in as the admin account, reusing a cached session when one
    /// exists. A cache hit restores cookies and storage instead of
    /// driving the login form again.
    pub async fn login_as_admin(&self) -> ComprarResult<&Self> {
        let identity = LoginIdentity::User(UserGenerator::admin());
        let key = identity.session_key();

        if let Some(snapshot) = self.sessions.get(&key) {
            info!(%key, "restoring cached session");
            self.driver.restore_session(&snapshot).await?;
            self.nav.visit(&self.config.ecommerce_url()).await?;
            self.verify_product_list_loaded().await?;
            return Ok(self);
        }

        self.visit().await?;
        self.login(&identity).await?;
        self.verify_product_list_loaded().await?;
        let snapshot = self.driver.snapshot_session().await?;
        self.sessions.store(key, snapshot);
        Ok(self)
    }

    /// Log in with generated invalid credentials and assert the
    /// application rejects them.
    pub async fn login_with_invalid_credentials(&self) -> ComprarResult<&Self> {
        let user = UserGenerator::invalid();
        info!(email = %user.email, "login with invalid credentials");
        self.visit().await?;
        self.login(&LoginIdentity::User(user)).await?;
        self.login_form
            .verify_error_message(&TextExpectation::pattern(
                r"(?i)Bad credentials|Please try again|registered",
            ))
            .await?;
        Ok(self)
    }

    /// Add products to the cart by pick
    pub async fn add_to_cart(&self, pick: &ProductPick) -> ComprarResult<&Self> {
        match pick {
            ProductPick::ByName(name) => {
                self.product_list.add_product_by_name(name).await?;
            }
            ProductPick::ByIndex(index) => {
                self.product_list.add_product_by_index(*index).await?;
            }
            ProductPick::FirstN(count) => {
                self.product_list.add_products_to_cart(*count).await?;
            }
        }
        Ok(self)
    }

    /// Add several specific products, by name
    pub async fn add_specific_products_to_cart(&self, names: &[&str]) -> ComprarResult<&Self> {
        info!(?names, "adding specific products");
        for name in names {
            self.add_to_cart(&ProductPick::ByName((*name).to_string())).await?;
        }
        Ok(self)
    }

    /// Add the first `count` rendered products
    pub async fn add_random_products_to_cart(&self, count: usize) -> ComprarResult<&Self> {
        self.add_to_cart(&ProductPick::FirstN(count)).await
    }

    /// Proceed to checkout
    pub async fn proceed_to_checkout(&self) -> ComprarResult<&Self> {
        self.checkout.proceed_to_checkout().await?;
        Ok(self)
    }

    /// Fill and submit the shipping form
    pub async fn complete_shipping(&self, address: &ShippingAddress) -> ComprarResult<&Self> {
        info!("completing shipping");
        self.shipping_form.fill_and_submit(address).await?;
        Ok(self)
    }

    /// Assert the confirmation message carries the expected address
    pub async fn verify_order_success(
        &self,
        address: &ShippingAddress,
    ) -> ComprarResult<&Self> {
        self.shipping_form.verify_order_success(address).await?;
        Ok(self)
    }

    /// Assert the shipping form fields are visible and enabled
    pub async fn verify_shipping_form(&self) -> ComprarResult<&Self> {
        self.shipping_form.verify_form_fields().await?;
        Ok(self)
    }

    /// Assert at least one product entry rendered
    pub async fn verify_product_list_loaded(&self) -> ComprarResult<&Self> {
        let items = self.product_list.shop_items().await?;
        if items.is_empty() {
            return Err(ComprarError::assertion("product list rendered no entries"));
        }
        Ok(self)
    }

    /// Assert the shipping form is visible
    pub async fn verify_shipping_form_visible(&self) -> ComprarResult<&Self> {
        self.checkout.verify_checkout_loaded().await?;
        Ok(self)
    }

    /// Reconcile the displayed cart total against the named products.
    ///
    /// Each unit price is an independently-scheduled read against the
    /// live DOM; the reads are joined at an explicit fan-in barrier and
    /// only then is the accumulated sum compared to the displayed total.
    pub async fn verify_cart_total_matches_products(
        &self,
        names: &[&str],
    ) -> ComprarResult<&Self> {
        info!(?names, "verifying cart total");
        let reads = names
            .iter()
            .map(|name| self.product_list.item_price_by_name(name));
        let prices = try_join_all(reads).await?;
        let expected: f64 = prices.iter().sum();

        let displayed = self.product_list.cart_total().await?;
        if (displayed - expected).abs() < 0.005 {
            Ok(self)
        } else {
            Err(ComprarError::assertion(format!(
                "cart total {displayed:.2} != sum of unit prices {expected:.2}"
            )))
        }
    }

    /// Log out
    pub async fn logout(&self) -> ComprarResult<&Self> {
        self.nav.logout().await?;
        Ok(self)
    }
}
