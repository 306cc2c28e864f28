//! Notification channel to the presentation layer.
//!
//! Components never render anything themselves; they push [`Notification`]s
//! into a [`Notifier`] and the presentation layer drains the receiver.

use qkart_core::{Notification, Severity};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Shown when an add/update is attempted without a credential.
pub const LOGIN_REQUIRED: &str = "Login to add an item to the Cart";

/// Shown when a catalog "add" targets a product that is already in the cart.
pub const ALREADY_IN_CART: &str =
    "Item already in cart. Use the cart sidebar to update quantity or remove item.";

/// Shown when the cart cannot be fetched for a reason other than credentials.
pub const CART_UNAVAILABLE: &str = "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON.";

/// Shown when a cart mutation fails for a reason other than credentials.
pub const CART_UPDATE_FAILED: &str = "Could not update the cart. Check that the backend is running, reachable and returns valid JSON.";

/// Shown when the catalog cannot be fetched.
pub const BACKEND_UNREACHABLE: &str = "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Create a notifier and the receiver the presentation layer drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publish a notification.
    ///
    /// A closed receiver only means nobody is displaying notifications
    /// anymore, so the notification is dropped.
    pub fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Warning => warn!(message = %notification.message, "User warning"),
            Severity::Error => debug!(message = %notification.message, "User error"),
        }
        let _ = self.tx.send(notification);
    }

    /// Publish a warning.
    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notification::warning(message));
    }

    /// Publish an error.
    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }
}
