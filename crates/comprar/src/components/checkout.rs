//! Checkout component.

use std::sync::Arc;
use tracing::info;

use crate::action::{self, safe_click};
use crate::driver::Driver;
use crate::result::ComprarResult;
use crate::selectors::{ecommerce, shipping, SelectorRegistry};
use crate::wait::WaitOptions;

/// Checkout process interactions
#[derive(Clone)]
pub struct Checkout {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    options: WaitOptions,
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}

impl Checkout {
    /// Create the component over a driver and selector registry
    #[must_use]
    pub fn new(
        driver: Arc<dyn Driver>,
        registry: Arc<SelectorRegistry>,
        options: WaitOptions,
    ) -> Self {
        Self {
            driver,
            registry,
            options,
        }
    }

    /// Open the cart
    pub async fn open_cart(&self) -> ComprarResult<&Self> {
        info!("opening cart");
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(ecommerce::CART_BUTTON),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Proceed to checkout
    pub async fn proceed_to_checkout(&self) -> ComprarResult<&Self> {
        info!("proceeding to checkout");
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(ecommerce::CHECKOUT_BUTTON),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Assert the checkout (shipping form) is rendered
    pub async fn verify_checkout_loaded(&self) -> ComprarResult<&Self> {
        info!("verifying checkout page loaded");
        let _ = action::resolve_visible(
            self.driver.as_ref(),
            self.registry.chain(shipping::FORM),
            self.options,
        )
        .await?;
        Ok(self)
    }
}
