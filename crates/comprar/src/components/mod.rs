//! Mid-level page components.
//!
//! Each component wraps one region of the remote UI and exposes semantic
//! operations built from the safe-interaction primitives and the selector
//! registry. Components are cheap, stateless handles: all observable state
//! lives in the remote DOM.

mod checkout;
mod login_form;
mod product_list;
mod shipping_form;

pub use checkout::Checkout;
pub use login_form::{LoginForm, SubmissionOutcome};
pub use product_list::ProductList;
pub use shipping_form::{ShippingField, ShippingForm};
