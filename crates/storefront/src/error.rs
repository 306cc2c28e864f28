//! Error reporting with Sentry integration.
//!
//! No failure in the storefront client is fatal: every gateway error is
//! captured (when it is a connectivity problem), logged, and turned into a
//! user-facing notification while state stays unchanged.

use crate::gateway::GatewayError;
use crate::notify::Notifier;

/// Report a failed backend call to Sentry, the log and the user.
///
/// Connectivity-class errors (transport, 5xx, bad JSON) are captured to
/// Sentry. Backend verdicts (401, 404) are expected outcomes and only logged.
pub fn report(notifier: &Notifier, error: &GatewayError, generic: &str) {
    if error.is_network() {
        let event_id = sentry::capture_error(error);
        tracing::error!(
            error = %error,
            sentry_event_id = %event_id,
            "Backend call failed"
        );
    } else {
        tracing::warn!(error = %error, "Backend rejected request");
    }

    notifier.notify(error.notification(generic));
}

/// Set the Sentry user context from the logged-in username.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Add to cart", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
