//! Product list component.
//!
//! Products carry no stable IDs; every operation scans the rendered
//! entries at interaction time. The add-to-cart buttons are hidden in the
//! target markup, so adds click the resolved handle directly instead of
//! going through the visibility-gated safe click.

use std::sync::Arc;
use tracing::info;

use crate::action;
use crate::driver::{Driver, ElementId};
use crate::model::{parse_count, parse_price};
use crate::result::{ComprarError, ComprarResult};
use crate::selectors::{ecommerce, SelectorRegistry};
use crate::wait::WaitOptions;

/// Semantic operations on the rendered product list and cart readouts
#[derive(Clone)]
pub struct ProductList {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    options: WaitOptions,
}

impl std::fmt::Debug for ProductList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductList").finish_non_exhaustive()
    }
}

impl ProductList {
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

    /// All rendered product entries, in document order.
    ///
    /// Waits until at least one entry renders.
    pub async fn shop_items(&self) -> ComprarResult<Vec<ElementId>> {
        action::resolve_all(
            self.driver.as_ref(),
            self.registry.chain(ecommerce::SHOP_ITEM),
            self.options,
        )
        .await
    }

    async fn item_title(&self, item: &ElementId) -> ComprarResult<String> {
        let driver = self.driver.as_ref();
        let chain = self.registry.chain(ecommerce::SHOP_ITEM_TITLE);
        for candidate in chain.candidates() {
            if let Some(title) = driver.find_within(item, candidate).await?.into_iter().next() {
                return driver.text(&title).await;
            }
        }
        Ok(String::new())
    }

    async fn click_item_button(&self, item: &ElementId) -> ComprarResult<()> {
        let driver = self.driver.as_ref();
        let chain = self.registry.chain(ecommerce::SHOP_ITEM_BUTTON);
        for candidate in chain.candidates() {
            if let Some(button) = driver.find_within(item, candidate).await?.into_iter().next() {
                // hidden in the target markup: click without visibility gate
                return driver.click(&button).await;
            }
        }
        Err(ComprarError::assertion(format!(
            "no add-to-cart control inside item {item}"
        )))
    }

    /// Add the product at an ordinal position to the cart
    pub async fn add_product_by_index(&self, index: usize) -> ComprarResult<&Self> {
        info!(index, "adding product by index");
        let items = self.shop_items().await?;
        let item = items.get(index).ok_or_else(|| {
            ComprarError::assertion(format!(
                "product index {index} out of range ({} rendered)",
                items.len()
            ))
        })?;
        self.click_item_button(item).await?;
        Ok(self)
    }

    /// Add a product by exact or substring name match.
    ///
    /// Entries are scanned in rendered order; the first match wins and the
    /// scan stops there.
    pub async fn add_product_by_name(&self, name: &str) -> ComprarResult<&Self> {
        info!(name, "adding product by name");
        for item in self.shop_items().await? {
            if self.item_title(&item).await?.contains(name) {
                self.click_item_button(&item).await?;
                return Ok(self);
            }
        }
        Err(ComprarError::assertion(format!(
            "no rendered product named {name:?}"
        )))
    }

    /// Add the first `count` products in rendered order
    pub async fn add_products_to_cart(&self, count: usize) -> ComprarResult<&Self> {
        info!(count, "adding first products");
        let items = self.shop_items().await?;
        for item in items.iter().take(count) {
            self.click_item_button(item).await?;
        }
        Ok(self)
    }

    /// Count of items in the cart, read from the first *visible* badge.
    ///
    /// The page renders a hidden duplicate badge; it is deliberately
    /// filtered out.
    pub async fn cart_count(&self) -> ComprarResult<usize> {
        let driver = self.driver.as_ref();
        let badge = action::resolve_visible(
            driver,
            self.registry.chain(ecommerce::CART_QUANTITY),
            self.options,
        )
        .await?;
        let text = driver.text(&badge).await?;
        Ok(parse_count(&text))
    }

    /// Unit price of a product, located by name, parsed from its
    /// localized currency text.
    pub async fn item_price_by_name(&self, name: &str) -> ComprarResult<f64> {
        let driver = self.driver.as_ref();
        for item in self.shop_items().await? {
            if !self.item_title(&item).await?.contains(name) {
                continue;
            }
            let chain = self.registry.chain(ecommerce::SHOP_ITEM_PRICE);
            for candidate in chain.candidates() {
                if let Some(price) =
                    driver.find_within(&item, candidate).await?.into_iter().next()
                {
                    let text = driver.text(&price).await?;
                    return parse_price(&text).ok_or_else(|| {
                        ComprarError::assertion(format!(
                            "unparseable price text {text:?} for {name:?}"
                        ))
                    });
                }
            }
        }
        Err(ComprarError::assertion(format!(
            "no rendered product named {name:?}"
        )))
    }

    /// The displayed cart total, parsed with the same currency rule
    pub async fn cart_total(&self) -> ComprarResult<f64> {
        let driver = self.driver.as_ref();
        let total = action::resolve(
            driver,
            self.registry.chain(ecommerce::CART_TOTAL),
            self.options,
        )
        .await?;
        let text = driver.text(&total).await?;
        parse_price(&text)
            .ok_or_else(|| ComprarError::assertion(format!("unparseable cart total {text:?}")))
    }
}
