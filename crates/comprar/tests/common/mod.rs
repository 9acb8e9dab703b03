//! Shared harness for the integration suite.
//!
//! Every test case gets a fresh scripted storefront and page objects over
//! it; nothing persists across cases except what a test explicitly caches.

use std::sync::Arc;

use comprar::fixture::{Fixture, FixtureManager};
use comprar::{ComprarResult, EcommercePage, FileUploadPage, MockStorefront, SuiteConfig};

/// Suite config tuned for the in-memory host: short timeouts, tight polls
pub fn config() -> SuiteConfig {
    SuiteConfig::default()
        .with_command_timeout(1000)
        .with_poll_interval(5)
}

struct TracingFixture;

impl Fixture for TracingFixture {
    fn setup(&mut self) -> ComprarResult<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
        Ok(())
    }

    fn teardown(&mut self) -> ComprarResult<()> {
        Ok(())
    }

    fn priority(&self) -> i32 {
        // logging comes up before anything else
        10
    }
}

pub fn init_tracing() {
    let mut fixtures = FixtureManager::new();
    fixtures.register(TracingFixture);
    fixtures.setup_all().expect("suite fixtures");
}

/// Fresh storefront plus the e-commerce page over it
#[allow(dead_code)]
pub fn ecommerce_harness() -> (Arc<MockStorefront>, EcommercePage) {
    init_tracing();
    let config = config();
    let store = Arc::new(MockStorefront::new(&config));
    let driver: Arc<dyn comprar::Driver> = Arc::clone(&store);
    let page = EcommercePage::new(driver, config);
    (store, page)
}

/// Fresh storefront plus the file-upload page over it
#[allow(dead_code)]
pub fn file_upload_harness() -> (Arc<MockStorefront>, FileUploadPage) {
    init_tracing();
    let config = config();
    let store = Arc::new(MockStorefront::new(&config));
    let driver: Arc<dyn comprar::Driver> = Arc::clone(&store);
    let page = FileUploadPage::new(driver, config);
    (store, page)
}
