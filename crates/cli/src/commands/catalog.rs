//! Catalog commands.

use qkart_core::Notification;
use qkart_storefront::{HttpGateway, Storefront};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::CliError;
use crate::output;

/// List the full catalog.
///
/// # Errors
///
/// Never fails; backend failures are printed as notifications.
pub async fn products(
    storefront: &Storefront<HttpGateway>,
    mut notifications: UnboundedReceiver<Notification>,
) -> Result<(), CliError> {
    storefront.mount().await;

    output::drain(&mut notifications);
    output::products(&storefront.snapshot().catalog);
    Ok(())
}

/// Search the catalog once, without debouncing.
///
/// # Errors
///
/// Never fails; backend failures are printed as notifications.
pub async fn search(
    storefront: &Storefront<HttpGateway>,
    mut notifications: UnboundedReceiver<Notification>,
    text: &str,
) -> Result<(), CliError> {
    storefront.search(text).await;

    output::drain(&mut notifications);
    output::products(&storefront.snapshot().catalog);
    Ok(())
}
