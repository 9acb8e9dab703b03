//! Base navigation capability.

use std::sync::Arc;
use tracing::info;

use crate::action::{self, safe_click};
use crate::driver::Driver;
use crate::locator::SelectorChain;
use crate::result::ComprarResult;
use crate::selectors::{common, ecommerce, login, SelectorRegistry};
use crate::wait::WaitOptions;

/// Navigation operations shared by every page
#[derive(Clone)]
pub struct Nav {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    options: WaitOptions,
}

impl std::fmt::Debug for Nav {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nav").finish_non_exhaustive()
    }
}

impl Nav {
    /// Create the capability over a driver and selector registry
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

    /// Navigate to a URL and wait for the body to render
    pub async fn visit(&self, url: &str) -> ComprarResult<&Self> {
        info!(url, "visiting");
        self.driver.visit(url).await?;
        let body = action::resolve(
            self.driver.as_ref(),
            self.registry.chain(common::BODY),
            self.options,
        )
        .await?;
        action::wait_visible(self.driver.as_ref(), &body, common::BODY, self.options).await?;
        Ok(self)
    }

    /// Log out and wait until the login form is back
    pub async fn logout(&self) -> ComprarResult<&Self> {
        info!("logging out");
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(ecommerce::LOGOUT_BUTTON),
            self.options,
        )
        .await?;
        let _ = action::resolve_visible(
            self.driver.as_ref(),
            self.registry.chain(login::EMAIL_FIELD),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Reload the current page
    pub async fn reload(&self) -> ComprarResult<&Self> {
        self.driver.reload().await?;
        Ok(self)
    }

    /// Whether any candidate of a chain currently matches, without waiting
    pub async fn element_exists(&self, chain: &SelectorChain) -> ComprarResult<bool> {
        action::exists(self.driver.as_ref(), chain).await
    }
}
