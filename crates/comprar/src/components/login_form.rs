//! Login form component.

use std::sync::Arc;
use tracing::info;

use crate::action::{self, safe_click, safe_type};
use crate::driver::{Driver, ElementId};
use crate::result::{ComprarError, ComprarResult};
use crate::model::TextExpectation;
use crate::selectors::{login, SelectorRegistry};
use crate::wait::{wait_until, WaitOptions};

/// Outcome of one submission attempt.
///
/// `ValidationBlocked` means native constraint validation stopped the
/// submission before any round trip; `CredentialsRejected` means the
/// application answered and rendered an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The application accepted the login
    Accepted,
    /// Native validation blocked the submission, with its message
    ValidationBlocked(String),
    /// The application rendered an error, with its text
    CredentialsRejected(String),
}

/// Semantic operations on the login form
#[derive(Clone)]
pub struct LoginForm {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    options: WaitOptions,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").finish_non_exhaustive()
    }
}

impl LoginForm {
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

    /// Resolve the email field
    pub async fn email_field(&self) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(login::EMAIL_FIELD),
            self.options,
        )
        .await
    }

    /// Resolve the password field
    pub async fn password_field(&self) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(login::PASSWORD_FIELD),
            self.options,
        )
        .await
    }

    /// Resolve the submit control
    pub async fn submit_button(&self) -> ComprarResult<ElementId> {
        action::resolve(
            self.driver.as_ref(),
            self.registry.chain(login::SUBMIT_BUTTON),
            self.options,
        )
        .await
    }

    /// Block until the form is ready: email and password visible, submit
    /// visible and enabled.
    pub async fn wait_for_ready(&self) -> ComprarResult<&Self> {
        info!("waiting for login form to be ready");
        let driver = self.driver.as_ref();

        let email = self.email_field().await?;
        action::wait_visible(driver, &email, login::EMAIL_FIELD, self.options).await?;

        let password = self.password_field().await?;
        action::wait_visible(driver, &password, login::PASSWORD_FIELD, self.options).await?;

        let submit = self.submit_button().await?;
        action::wait_visible(driver, &submit, login::SUBMIT_BUTTON, self.options).await?;
        action::wait_enabled(driver, &submit, login::SUBMIT_BUTTON, self.options).await?;

        Ok(self)
    }

    /// Clear both fields, then type each given value only if non-empty.
    ///
    /// An empty value leaves its field genuinely blank rather than typing
    /// an empty string, so native required-field validation can fire.
    pub async fn fill_form(&self, email: &str, password: &str) -> ComprarResult<&Self> {
        info!(email, "filling login form");
        let driver = self.driver.as_ref();
        safe_type(
            driver,
            self.registry.chain(login::EMAIL_FIELD),
            email,
            self.options,
        )
        .await?;
        safe_type(
            driver,
            self.registry.chain(login::PASSWORD_FIELD),
            password,
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Safe-click the submit control
    pub async fn submit(&self) -> ComprarResult<&Self> {
        info!("submitting login form");
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(login::SUBMIT_BUTTON),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Full login: wait for readiness, fill, submit
    pub async fn login(&self, email: &str, password: &str) -> ComprarResult<&Self> {
        self.wait_for_ready().await?;
        self.fill_form(email, password).await?;
        self.submit().await
    }

    /// Assert the application-rendered error element becomes visible and
    /// its text matches the expectation.
    pub async fn verify_error_message(
        &self,
        expected: &TextExpectation,
    ) -> ComprarResult<&Self> {
        let driver = self.driver.as_ref();
        let error = action::resolve_visible(
            driver,
            self.registry.chain(login::ERROR_MESSAGE),
            self.options,
        )
        .await?;

        let text = driver.text(&error).await?;
        if expected.matches(&text) {
            Ok(self)
        } else {
            Err(ComprarError::assertion(format!(
                "login error {text:?} does not match {expected}"
            )))
        }
    }

    /// Assert the email input's native validation message matches the
    /// expectation (e.g. the browser's "missing an '@'" wording).
    ///
    /// This exercises built-in constraint validation: the submission never
    /// reached the application.
    pub async fn validate_email_popup(
        &self,
        expected: &TextExpectation,
    ) -> ComprarResult<&Self> {
        let driver = self.driver.as_ref();
        let email = self.email_field().await?;
        let email_ref = &email;

        let description = format!("native validation message on {}", login::EMAIL_FIELD);
        let _ = wait_until(&description, self.options, || async move {
            Ok(!driver.validation_message(email_ref).await?.is_empty())
        })
        .await?;

        let message = driver.validation_message(&email).await?;
        if expected.matches(&message) {
            Ok(self)
        } else {
            Err(ComprarError::assertion(format!(
                "validation message {message:?} does not match {expected}"
            )))
        }
    }

    /// Classify the outcome of the latest submission attempt.
    pub async fn submission_outcome(&self) -> ComprarResult<SubmissionOutcome> {
        let driver = self.driver.as_ref();

        let email = self.email_field().await?;
        let message = driver.validation_message(&email).await?;
        if !message.is_empty() {
            return Ok(SubmissionOutcome::ValidationBlocked(message));
        }

        let error_chain = self.registry.chain(login::ERROR_MESSAGE);
        if action::exists(driver, error_chain).await? {
            let error = action::resolve(driver, error_chain, self.options).await?;
            if driver.is_visible(&error).await? {
                let text = driver.text(&error).await?;
                return Ok(SubmissionOutcome::CredentialsRejected(text));
            }
        }

        Ok(SubmissionOutcome::Accepted)
    }
}
