//! Safe interaction primitives.
//!
//! Every interaction follows the same discipline: resolve the target
//! (first matching candidate of its fallback chain, bounded wait), scroll
//! it into view, wait until it is visible, wait until it is enabled, then
//! act. A wait that exceeds its timeout fails the command; there is no
//! retry at this layer.

use tracing::debug;

use crate::driver::{Driver, ElementId};
use crate::locator::SelectorChain;
use crate::result::ComprarResult;
use crate::wait::{wait_for_some, wait_until, WaitOptions};

/// An interaction target: a selector chain still to resolve, or an
/// element handle already in hand.
#[derive(Debug, Clone)]
pub enum Target<'a> {
    /// Resolve through the fallback chain at interaction time
    Chain(&'a SelectorChain),
    /// Use an already-resolved handle
    Element(ElementId),
}

impl<'a> From<&'a SelectorChain> for Target<'a> {
    fn from(chain: &'a SelectorChain) -> Self {
        Self::Chain(chain)
    }
}

impl From<ElementId> for Target<'_> {
    fn from(element: ElementId) -> Self {
        Self::Element(element)
    }
}

impl Target<'_> {
    fn describe(&self) -> String {
        match self {
            Self::Chain(chain) => chain.name().to_string(),
            Self::Element(element) => format!("element {element}"),
        }
    }
}

/// Scan a chain's candidates once, in listed order; first candidate with
/// at least one match wins.
async fn scan_chain(
    driver: &dyn Driver,
    chain: &SelectorChain,
) -> ComprarResult<Option<Vec<ElementId>>> {
    for candidate in chain.candidates() {
        let found = driver.find(candidate).await?;
        if !found.is_empty() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Resolve a chain to the first matching element, waiting until one of the
/// candidates matches.
///
/// # Errors
///
/// Times out, naming the semantic element, if no candidate resolves.
pub async fn resolve(
    driver: &dyn Driver,
    chain: &SelectorChain,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let elements = resolve_all(driver, chain, options).await?;
    Ok(elements
        .into_iter()
        .next()
        .expect("winning candidate matched at least one element"))
}

/// Resolve a chain to every element matched by the winning candidate, in
/// document order.
///
/// # Errors
///
/// Times out, naming the semantic element, if no candidate resolves.
pub async fn resolve_all(
    driver: &dyn Driver,
    chain: &SelectorChain,
    options: WaitOptions,
) -> ComprarResult<Vec<ElementId>> {
    wait_for_some(chain.name(), options, || scan_chain(driver, chain)).await
}

/// Resolve a chain to the first element that is both matched and visible.
///
/// Skips hidden duplicates (the cart badge renders one visible and one
/// hidden instance).
///
/// # Errors
///
/// Times out if no visible match appears.
pub async fn resolve_visible(
    driver: &dyn Driver,
    chain: &SelectorChain,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let description = format!("{} (visible)", chain.name());
    wait_for_some(&description, options, || async move {
        let Some(candidates) = scan_chain(driver, chain).await? else {
            return Ok(None);
        };
        for element in candidates {
            if driver.is_visible(&element).await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    })
    .await
}

/// Check, without waiting, whether any candidate currently matches.
pub async fn exists(driver: &dyn Driver, chain: &SelectorChain) -> ComprarResult<bool> {
    Ok(scan_chain(driver, chain).await?.is_some())
}

async fn resolve_target<'a>(
    driver: &dyn Driver,
    target: &Target<'a>,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    match target {
        Target::Chain(chain) => resolve(driver, chain, options).await,
        Target::Element(element) => Ok(element.clone()),
    }
}

/// Wait until an element reports visible.
///
/// # Errors
///
/// Times out if the element stays hidden.
pub async fn wait_visible(
    driver: &dyn Driver,
    element: &ElementId,
    description: &str,
    options: WaitOptions,
) -> ComprarResult<()> {
    let description = format!("{description} to be visible");
    let _ = wait_until(&description, options, || driver.is_visible(element)).await?;
    Ok(())
}

/// Wait until an element reports enabled.
///
/// # Errors
///
/// Times out if the element stays disabled.
pub async fn wait_enabled(
    driver: &dyn Driver,
    element: &ElementId,
    description: &str,
    options: WaitOptions,
) -> ComprarResult<()> {
    let description = format!("{description} to be enabled");
    let _ = wait_until(&description, options, || driver.is_enabled(element)).await?;
    Ok(())
}

async fn prepare<'a>(
    driver: &dyn Driver,
    target: &Target<'a>,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let description = target.describe();
    let element = resolve_target(driver, target, options).await?;
    driver.scroll_into_view(&element).await?;
    wait_visible(driver, &element, &description, options).await?;
    wait_enabled(driver, &element, &description, options).await?;
    Ok(element)
}

/// Safely click a target: scroll into view, wait visible, wait enabled,
/// click.
///
/// # Errors
///
/// Propagates resolution timeouts and input failures uncaught.
pub async fn safe_click<'a>(
    driver: &dyn Driver,
    target: impl Into<Target<'a>>,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let target = target.into();
    debug!(target = %target.describe(), "safe click");
    let element = prepare(driver, &target, options).await?;
    driver.click(&element).await?;
    Ok(element)
}

/// Safely fill a target: the same readiness discipline, then clear and
/// type. An empty value clears the field and types nothing, leaving it
/// genuinely blank.
///
/// # Errors
///
/// Propagates resolution timeouts and input failures uncaught.
pub async fn safe_type<'a>(
    driver: &dyn Driver,
    target: impl Into<Target<'a>>,
    text: &str,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let target = target.into();
    debug!(target = %target.describe(), "safe type");
    let element = prepare(driver, &target, options).await?;
    driver.clear(&element).await?;
    if !text.is_empty() {
        driver.type_text(&element, text).await?;
    }
    Ok(element)
}

/// Safely select a dropdown option by visible label.
///
/// # Errors
///
/// Propagates resolution timeouts and input failures uncaught.
pub async fn safe_select<'a>(
    driver: &dyn Driver,
    target: impl Into<Target<'a>>,
    label: &str,
    options: WaitOptions,
) -> ComprarResult<ElementId> {
    let target = target.into();
    debug!(target = %target.describe(), label, "safe select");
    let element = prepare(driver, &target, options).await?;
    driver.select_option(&element, label).await?;
    Ok(element)
}
