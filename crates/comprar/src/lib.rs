//! Comprar: Rust-native end-to-end test kit for a demo storefront.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     COMPRAR Architecture                        │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌────────────┐   ┌─────────┐ │
//! │  │ Test Spec │──►│ Page      │──►│ Components │──►│ Driver  │ │
//! │  │ (Rust)    │   │ Façades   │   │ + Actions  │   │ (CDP /  │ │
//! │  │           │   │           │   │            │   │  mock)  │ │
//! │  └───────────┘   └───────────┘   └────────────┘   └─────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pages compose components; components build semantic operations from
//! safe-interaction primitives and the selector registry's fallback
//! chains; the driver is the serialized command queue against the remote
//! DOM. Data generators and JSON fixtures feed the test specifications.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Safe interaction primitives
pub mod action;
/// Suite configuration and fixture loading
pub mod config;
/// Test data generators
pub mod data;
/// Native dialog capture
pub mod dialog;
mod driver;
/// Fixture setup/teardown management
pub mod fixture;
mod locator;
/// Scripted in-memory storefront for hermetic runs
pub mod mock;
/// Domain value objects
pub mod model;
mod result;
/// Selector registry for the target applications
pub mod selectors;
/// Cached authenticated sessions
pub mod session;
/// Bounded asynchronous waits
pub mod wait;

/// Mid-level page components
pub mod components;
/// Top-level page façades
pub mod pages;

pub use action::{safe_click, safe_select, safe_type, Target};
pub use components::{Checkout, LoginForm, ProductList, ShippingField, ShippingForm, SubmissionOutcome};
pub use config::{load_fixture, SuiteConfig};
pub use dialog::{AutoDialogBehavior, Dialog, DialogAction, DialogHandler, DialogType};
#[cfg(feature = "browser")]
pub use driver::CdpDriver;
pub use driver::{Driver, ElementId, FilePayload};
pub use locator::{Selector, SelectorChain};
pub use mock::MockStorefront;
pub use model::{
    parse_count, parse_price, Credentials, LoginIdentity, ProductPick, Role, ShippingAddress,
    TextExpectation,
};
pub use pages::{EcommercePage, FileUploadPage, Nav};
pub use result::{ComprarError, ComprarResult};
pub use selectors::SelectorRegistry;
pub use session::{Cookie, SessionCache, SessionSnapshot};
pub use wait::{wait_for_some, wait_until, WaitOptions, WaitResult};
