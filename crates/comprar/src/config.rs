//! Suite configuration and fixture loading.
//!
//! Base URLs, timeouts and viewport come from one `SuiteConfig` value that
//! tests construct up front and share read-only. Environment variables
//! override the defaults; structured test data comes from JSON fixture
//! files.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::ComprarResult;

/// Default per-command timeout (10 seconds)
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Default page load timeout (60 seconds)
pub const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 60_000;

/// Default polling interval for waits (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Configuration for a test suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL of the target applications
    pub base_url: String,
    /// Path of the e-commerce demo, relative to `base_url`
    pub ecommerce_path: String,
    /// Path of the file-upload demo, relative to `base_url`
    pub file_upload_path: String,
    /// Per-command timeout in milliseconds
    pub command_timeout_ms: u64,
    /// Page load timeout in milliseconds
    pub page_load_timeout_ms: u64,
    /// Polling interval for wait conditions in milliseconds
    pub poll_interval_ms: u64,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Run the browser headless
    pub headless: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://qa-practice.netlify.app".to_string(),
            ecommerce_path: "/auth_ecommerce".to_string(),
            file_upload_path: "/file-upload".to_string(),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            viewport_width: 1280,
            viewport_height: 720,
            headless: true,
        }
    }
}

impl SuiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with defaults, then apply environment overrides.
    ///
    /// Recognized variables: `COMPRAR_BASE_URL`, `COMPRAR_ECOMMERCE_PATH`,
    /// `COMPRAR_FILE_UPLOAD_PATH`, `COMPRAR_COMMAND_TIMEOUT_MS`,
    /// `COMPRAR_HEADLESS`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("COMPRAR_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(path) = std::env::var("COMPRAR_ECOMMERCE_PATH") {
            config.ecommerce_path = path;
        }
        if let Ok(path) = std::env::var("COMPRAR_FILE_UPLOAD_PATH") {
            config.file_upload_path = path;
        }
        if let Ok(ms) = std::env::var("COMPRAR_COMMAND_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.command_timeout_ms = ms;
            }
        }
        if let Ok(headless) = std::env::var("COMPRAR_HEADLESS") {
            config.headless = headless != "0" && headless != "false";
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-command timeout
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout_ms: u64) -> Self {
        self.command_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Full URL of the e-commerce demo
    #[must_use]
    pub fn ecommerce_url(&self) -> String {
        format!("{}{}", self.base_url, self.ecommerce_path)
    }

    /// Full URL of the file-upload demo
    #[must_use]
    pub fn file_upload_url(&self) -> String {
        format!("{}{}", self.base_url, self.file_upload_path)
    }

    /// Extra Chromium arguments for headless runs
    #[must_use]
    pub fn browser_args(&self) -> Vec<&'static str> {
        if self.headless {
            vec![
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--disable-software-rasterizer",
                "--no-sandbox",
                "--disable-extensions",
            ]
        } else {
            Vec::new()
        }
    }
}

/// Load a JSON fixture file into a typed value.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize.
pub fn load_fixture<T: DeserializeOwned>(path: impl AsRef<Path>) -> ComprarResult<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = SuiteConfig::default();
        assert_eq!(
            config.ecommerce_url(),
            "https://qa-practice.netlify.app/auth_ecommerce"
        );
        assert_eq!(
            config.file_upload_url(),
            "https://qa-practice.netlify.app/file-upload"
        );
    }

    #[test]
    fn test_builder() {
        let config = SuiteConfig::new()
            .with_base_url("http://localhost:8080")
            .with_command_timeout(5000)
            .with_viewport(800, 600)
            .with_headless(false);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.command_timeout_ms, 5000);
        assert_eq!(config.viewport_width, 800);
        assert!(!config.headless);
        assert!(config.browser_args().is_empty());
    }

    #[test]
    fn test_headless_browser_args() {
        let config = SuiteConfig::default();
        let args = config.browser_args();
        assert!(args.contains(&"--no-sandbox"));
        assert!(args.contains(&"--disable-gpu"));
    }

    #[test]
    fn test_load_fixture() {
        use std::io::Write;

        #[derive(Deserialize)]
        struct Data {
            name: String,
            count: u32,
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "iPhone", "count": 2}}"#).unwrap();

        let data: Data = load_fixture(file.path()).unwrap();
        assert_eq!(data.name, "iPhone");
        assert_eq!(data.count, 2);
    }

    #[test]
    fn test_load_fixture_missing_file() {
        let result: ComprarResult<serde_json::Value> = load_fixture("/nonexistent/fixture.json");
        assert!(result.is_err());
    }
}
