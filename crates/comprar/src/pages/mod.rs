//! Top-level page façades.
//!
//! Pages compose the mid-level components into full user journeys. Shared
//! navigation (visit, logout, reload) is a capability a page *holds*, not
//! a base class it inherits from.

mod ecommerce;
mod file_upload;
mod nav;

pub use ecommerce::EcommercePage;
pub use file_upload::FileUploadPage;
pub use nav::Nav;
