//! Shipping form component and its stepwise validation protocol.
//!
//! The application validates required fields strictly in form order:
//! phone, then street, then city, then country. A submission with unmet
//! requirements surfaces only the FIRST one, through that field's native
//! validation message; filling it and resubmitting advances the blocking
//! requirement to the next field. No round trip happens until every
//! requirement is met.

use std::sync::Arc;
use tracing::info;

use crate::action::{self, safe_click, safe_select, safe_type};
use crate::driver::{Driver, ElementId};
use crate::model::{parse_price, strip_trailing_period, ShippingAddress};
use crate::result::{ComprarError, ComprarResult};
use crate::selectors::{order_confirmation, shipping, SelectorRegistry};
use crate::wait::WaitOptions;

/// The four required shipping fields, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    /// Phone number input
    Phone,
    /// Street address input
    Street,
    /// City input
    City,
    /// Country dropdown
    Country,
}

impl ShippingField {
    /// All fields in the order the application validates them
    pub const IN_VALIDATION_ORDER: [Self; 4] =
        [Self::Phone, Self::Street, Self::City, Self::Country];

    fn selector_name(self) -> &'static str {
        match self {
            Self::Phone => shipping::PHONE_FIELD,
            Self::Street => shipping::STREET_FIELD,
            Self::City => shipping::CITY_FIELD,
            Self::Country => shipping::COUNTRY_DROPDOWN,
        }
    }
}

/// Semantic operations on the shipping form
#[derive(Clone)]
pub struct ShippingForm {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    options: WaitOptions,
}

impl std::fmt::Debug for ShippingForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingForm").finish_non_exhaustive()
    }
}

impl ShippingForm {
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

    /// Resolve the form element
    pub async fn form(&self) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(shipping::FORM),
            self.options,
        )
        .await
    }

    /// Resolve one of the required fields
    pub async fn field(&self, field: ShippingField) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(field.selector_name()),
            self.options,
        )
        .await
    }

    /// Resolve the submit-order control
    pub async fn submit_button(&self) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(shipping::SUBMIT_ORDER_BUTTON),
            self.options,
        )
        .await
    }

    /// Native validation message currently reported by a field.
    ///
    /// Empty for every field except the one blocking submission.
    pub async fn validation_message(&self, field: ShippingField) -> ComprarResult<String> {
        let element = self.field(field).await?;
        self.driver.validation_message(&element).await
    }

    /// Fill a single field
    pub async fn fill_field(&self, field: ShippingField, value: &str) -> ComprarResult<&Self> {
        let driver = self.driver.as_ref();
        let chain = self.registry.chain(field.selector_name());
        match field {
            ShippingField::Country => {
                safe_select(driver, chain, value, self.options).await?;
            }
            _ => {
                safe_type(driver, chain, value, self.options).await?;
            }
        }
        Ok(self)
    }

    /// Fill the whole form. Defaults are applied by
    /// [`ShippingAddress::partial`] upstream, so partial-address tests
    /// still produce a submittable form.
    pub async fn fill_form(&self, address: &ShippingAddress) -> ComprarResult<&Self> {
        info!("filling shipping form");
        self.fill_field(ShippingField::Phone, &address.phone).await?;
        self.fill_field(ShippingField::Street, &address.street).await?;
        self.fill_field(ShippingField::City, &address.city).await?;
        self.fill_field(ShippingField::Country, &address.country).await?;
        Ok(self)
    }

    /// Click submit without waiting for an outcome.
    ///
    /// Used by stepwise-validation scenarios that expect the submission to
    /// be blocked. Resolves the control once and hands the safe click the
    /// element directly.
    pub async fn click_submit(&self) -> ComprarResult<&Self> {
        let button = self.submit_button().await?;
        safe_click(self.driver.as_ref(), button, self.options).await?;
        Ok(self)
    }

    /// Submit the form and block until the confirmation element is
    /// visible. Absence of the confirmation within the timeout is a
    /// failure, not a silent pass.
    pub async fn submit(&self) -> ComprarResult<&Self> {
        info!("submitting shipping form");
        self.click_submit().await?;
        let _ = action::resolve_visible(
            self.driver.as_ref(),
            self.registry.chain(order_confirmation::CONTAINER),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Fill and submit in one step
    pub async fn fill_and_submit(&self, address: &ShippingAddress) -> ComprarResult<&Self> {
        self.fill_form(address).await?;
        self.submit().await
    }

    /// Assert that at least `expected_min` required fields currently
    /// report a non-empty native validation message. With the stepwise
    /// protocol that is the single currently-blocking field.
    pub async fn verify_validation_errors(&self, expected_min: usize) -> ComprarResult<&Self> {
        info!(expected_min, "verifying validation errors");
        let mut reporting = 0;
        for field in ShippingField::IN_VALIDATION_ORDER {
            if !self.validation_message(field).await?.is_empty() {
                reporting += 1;
            }
        }
        if reporting >= expected_min {
            Ok(self)
        } else {
            Err(ComprarError::assertion(format!(
                "expected at least {expected_min} validation error(s), found {reporting}"
            )))
        }
    }

    /// Assert every field and the submit control are visible and enabled
    pub async fn verify_form_fields(&self) -> ComprarResult<&Self> {
        info!("verifying shipping form fields");
        let driver = self.driver.as_ref();
        for field in ShippingField::IN_VALIDATION_ORDER {
            let element = self.field(field).await?;
            let name = field.selector_name();
            action::wait_visible(driver, &element, name, self.options).await?;
            action::wait_enabled(driver, &element, name, self.options).await?;
        }
        let submit = self.submit_button().await?;
        action::wait_visible(driver, &submit, shipping::SUBMIT_ORDER_BUTTON, self.options)
            .await?;
        action::wait_enabled(driver, &submit, shipping::SUBMIT_ORDER_BUTTON, self.options)
            .await?;
        Ok(self)
    }

    /// Assert the order confirmation carries the expected shipping line.
    ///
    /// The confirmation renders two bolded fragments; the second must
    /// equal `"{street}, {city} - {country}"` once its trailing period is
    /// stripped.
    pub async fn verify_order_success(
        &self,
        expected: &ShippingAddress,
    ) -> ComprarResult<&Self> {
        let driver = self.driver.as_ref();
        let _ = action::resolve_visible(
            driver,
            self.registry.chain(order_confirmation::CONTAINER),
            self.options,
        )
        .await?;

        // first bold fragment carries the order amount
        let amount_bold = action::resolve(
            driver,
            self.registry.chain(order_confirmation::AMOUNT_BOLD),
            self.options,
        )
        .await?;
        let amount_text = driver.text(&amount_bold).await?;
        if parse_price(&amount_text).is_none() {
            return Err(ComprarError::assertion(format!(
                "confirmation amount {amount_text:?} is not a price"
            )));
        }

        // second bold fragment carries the shipping line
        let info_bold = action::resolve(
            driver,
            self.registry.chain(order_confirmation::INFO_BOLD),
            self.options,
        )
        .await?;
        let raw = driver.text(&info_bold).await?;
        let actual = strip_trailing_period(&raw);
        let expected_line = expected.confirmation_line();
        if actual == expected_line {
            Ok(self)
        } else {
            Err(ComprarError::assertion(format!(
                "confirmation line {actual:?} != expected {expected_line:?}"
            )))
        }
    }
}
