//! Native browser dialog capture.
//!
//! The demo shop raises a blocking alert when a product already in the
//! cart is added again. Dialogs are routed through a shared
//! [`DialogHandler`] hook; a test that anticipates a dialog registers a
//! handler (or auto behavior) before triggering it. An unhandled dialog
//! stays open and blocks the command queue, and the driver surfaces that as
//! [`crate::ComprarError::DialogBlocked`] on subsequent commands.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Type of browser dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
        }
    }
}

/// Action taken on a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Dialog was accepted (OK)
    Accept,
    /// Dialog was dismissed (Cancel)
    Dismiss,
    /// Dialog is pending (not yet handled)
    Pending,
}

/// A captured browser dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
    action: DialogAction,
}

impl Dialog {
    /// Create a new pending dialog
    #[must_use]
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            dialog_type,
            message: message.into(),
            action: DialogAction::Pending,
        }
    }

    /// Create an alert dialog
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message)
    }

    /// Create a confirm dialog
    #[must_use]
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(DialogType::Confirm, message)
    }

    /// Dialog type
    #[must_use]
    pub fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Message displayed in the dialog
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Action taken
    #[must_use]
    pub fn action(&self) -> DialogAction {
        self.action
    }

    /// Whether the dialog has been handled
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.action != DialogAction::Pending
    }

    /// Accept the dialog
    pub fn accept(&mut self) {
        self.action = DialogAction::Accept;
    }

    /// Dismiss the dialog
    pub fn dismiss(&mut self) {
        self.action = DialogAction::Dismiss;
    }
}

/// Handler function type for dialogs
pub type DialogHandlerFn = Box<dyn Fn(&mut Dialog) + Send + Sync>;

/// Automatic behavior applied when no custom handler decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoDialogBehavior {
    /// Accept all dialogs
    AcceptAll,
    /// Dismiss all dialogs
    DismissAll,
    /// Leave dialogs pending (tests handle them explicitly)
    #[default]
    Manual,
}

/// Shared hook capturing dialogs raised by the page.
///
/// Clones share state; the driver holds one clone and tests hold another.
#[derive(Clone, Default)]
pub struct DialogHandler {
    dialogs: Arc<Mutex<Vec<Dialog>>>,
    handler: Arc<Mutex<Option<DialogHandlerFn>>>,
    auto_behavior: Arc<Mutex<AutoDialogBehavior>>,
}

impl std::fmt::Debug for DialogHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogHandler")
            .field("dialog_count", &self.dialog_count())
            .finish_non_exhaustive()
    }
}

impl DialogHandler {
    /// Create a new dialog handler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom handler, invoked before the auto behavior
    pub fn on_dialog<F>(&self, handler: F)
    where
        F: Fn(&mut Dialog) + Send + Sync + 'static,
    {
        if let Ok(mut h) = self.handler.lock() {
            *h = Some(Box::new(handler));
        }
    }

    /// Set the automatic behavior
    pub fn set_auto_behavior(&self, behavior: AutoDialogBehavior) {
        if let Ok(mut b) = self.auto_behavior.lock() {
            *b = behavior;
        }
    }

    /// Route an incoming dialog through the custom handler, then the auto
    /// behavior. Returns the dialog with its final action; `Pending` means
    /// nothing handled it and the page stays blocked.
    pub fn handle(&self, mut dialog: Dialog) -> Dialog {
        if let Ok(handler) = self.handler.lock() {
            if let Some(ref h) = *handler {
                h(&mut dialog);
            }
        }

        if !dialog.is_handled() {
            let behavior = self.auto_behavior.lock().map(|b| *b).unwrap_or_default();
            match behavior {
                AutoDialogBehavior::AcceptAll => dialog.accept(),
                AutoDialogBehavior::DismissAll => dialog.dismiss(),
                AutoDialogBehavior::Manual => {}
            }
        }

        if let Ok(mut dialogs) = self.dialogs.lock() {
            dialogs.push(dialog.clone());
        }
        dialog
    }

    /// All dialogs captured so far
    #[must_use]
    pub fn dialogs(&self) -> Vec<Dialog> {
        self.dialogs.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of dialogs captured
    #[must_use]
    pub fn dialog_count(&self) -> usize {
        self.dialogs.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Clear captured history
    pub fn clear(&self) {
        if let Ok(mut d) = self.dialogs.lock() {
            d.clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_handler_accepts() {
        let handler = DialogHandler::new();
        handler.on_dialog(|dialog| {
            if dialog.message().contains("already added") {
                dialog.accept();
            }
        });

        let handled = handler.handle(Dialog::alert("Product already added to the cart"));
        assert_eq!(handled.action(), DialogAction::Accept);
        assert_eq!(handler.dialog_count(), 1);
    }

    #[test]
    fn test_manual_leaves_pending() {
        let handler = DialogHandler::new();
        let handled = handler.handle(Dialog::alert("surprise"));
        assert_eq!(handled.action(), DialogAction::Pending);
        assert!(!handled.is_handled());
    }

    #[test]
    fn test_auto_behaviors() {
        let handler = DialogHandler::new();
        handler.set_auto_behavior(AutoDialogBehavior::AcceptAll);
        assert_eq!(
            handler.handle(Dialog::confirm("sure?")).action(),
            DialogAction::Accept
        );

        handler.set_auto_behavior(AutoDialogBehavior::DismissAll);
        assert_eq!(
            handler.handle(Dialog::confirm("sure?")).action(),
            DialogAction::Dismiss
        );
    }

    #[test]
    fn test_clones_share_state() {
        let handler = DialogHandler::new();
        let clone = handler.clone();
        let _ = handler.handle(Dialog::alert("one"));
        assert_eq!(clone.dialog_count(), 1);
        clone.clear();
        assert_eq!(handler.dialog_count(), 0);
    }

    #[test]
    fn test_custom_handler_wins_over_auto() {
        let handler = DialogHandler::new();
        handler.set_auto_behavior(AutoDialogBehavior::AcceptAll);
        handler.on_dialog(Dialog::dismiss);

        let handled = handler.handle(Dialog::alert("no thanks"));
        assert_eq!(handled.action(), DialogAction::Dismiss);
    }
}
