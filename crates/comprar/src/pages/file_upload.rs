//! File upload page façade.

use std::sync::Arc;
use tracing::info;

use crate::action::{self, safe_click};
use crate::config::SuiteConfig;
use crate::driver::{Driver, FilePayload};
use crate::pages::Nav;
use crate::result::ComprarResult;
use crate::selectors::{file_upload, SelectorRegistry};
use crate::wait::WaitOptions;

/// Façade over the file-upload demo page
#[derive(Clone)]
pub struct FileUploadPage {
    driver: Arc<dyn Driver>,
    registry: Arc<SelectorRegistry>,
    config: SuiteConfig,
    options: WaitOptions,
    nav: Nav,
}

impl std::fmt::Debug for FileUploadPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUploadPage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FileUploadPage {
    /// Build the page over a driver and suite config
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, config: SuiteConfig) -> Self {
        let registry = Arc::new(SelectorRegistry::standard());
        let options = WaitOptions::new()
            .with_timeout(config.command_timeout_ms)
            .with_poll_interval(config.poll_interval_ms);
        Self {
            nav: Nav::new(Arc::clone(&driver), Arc::clone(&registry), options),
            driver,
            registry,
            config,
            options,
        }
    }

    /// Navigation capability
    #[must_use]
    pub fn nav(&self) -> &Nav {
        &self.nav
    }

    /// Visit the page and wait until the file input is present
    pub async fn visit(&self) -> ComprarResult<&Self> {
        self.nav.visit(&self.config.file_upload_url()).await?;
        let _ = action::resolve(
            self.driver.as_ref(),
            self.registry.chain(file_upload::FILE_INPUT),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Attach a file and submit the form
    pub async fn upload_file(&self, file: FilePayload) -> ComprarResult<&Self> {
        info!(name = %file.name, "uploading file");
        let input = action::resolve(
            self.driver.as_ref(),
            self.registry.chain(file_upload::FILE_INPUT),
            self.options,
        )
        .await?;
        self.driver.attach_files(&input, &[file]).await?;
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(file_upload::SUBMIT_BUTTON),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Submit the form without attaching anything
    pub async fn submit_without_file(&self) -> ComprarResult<&Self> {
        info!("submitting without a file");
        safe_click(
            self.driver.as_ref(),
            self.registry.chain(file_upload::SUBMIT_BUTTON),
            self.options,
        )
        .await?;
        Ok(self)
    }

    /// Names of the files currently attached to the input, read from the
    /// input's files property.
    pub async fn attached_file_names(&self) -> ComprarResult<Vec<String>> {
        let input = action::resolve(
            self.driver.as_ref(),
            self.registry.chain(file_upload::FILE_INPUT),
            self.options,
        )
        .await?;
        self.driver.attached_file_names(&input).await
    }

    /// Assert the success message rendered
    pub async fn verify_upload_success(&self) -> ComprarResult<&Self> {
        let _ = action::resolve_visible(
            self.driver.as_ref(),
            self.registry.chain(file_upload::SUCCESS_MESSAGE),
            self.options,
        )
        .await?;
        Ok(self)
    }
}
