//! Cart commands.
//!
//! Each command loads the catalog first: cart lines can only be displayed for
//! products the catalog knows about.

use qkart_core::{Notification, ProductId};
use qkart_storefront::{HttpGateway, MutationOutcome, Storefront};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::CliError;
use crate::output;

/// Show the cart.
///
/// # Errors
///
/// Never fails; backend failures are printed as notifications.
pub async fn show(
    storefront: &Storefront<HttpGateway>,
    mut notifications: UnboundedReceiver<Notification>,
) -> Result<(), CliError> {
    storefront.mount().await;

    output::drain(&mut notifications);
    output::cart(&storefront.snapshot());
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CliError::NotUpdated` if the cart was not changed.
pub async fn add(
    storefront: &Storefront<HttpGateway>,
    notifications: UnboundedReceiver<Notification>,
    product_id: ProductId,
) -> Result<(), CliError> {
    storefront.mount().await;
    let outcome = storefront.add_to_cart(&product_id).await;
    finish(storefront, notifications, &outcome)
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns `CliError::NotUpdated` if the cart was not changed.
pub async fn set_quantity(
    storefront: &Storefront<HttpGateway>,
    notifications: UnboundedReceiver<Notification>,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    storefront.mount().await;
    let outcome = storefront.set_quantity(&product_id, quantity).await;
    finish(storefront, notifications, &outcome)
}

fn finish(
    storefront: &Storefront<HttpGateway>,
    mut notifications: UnboundedReceiver<Notification>,
    outcome: &MutationOutcome,
) -> Result<(), CliError> {
    output::drain(&mut notifications);

    if !outcome.is_updated() {
        return Err(CliError::NotUpdated);
    }

    info!("Cart updated");
    output::cart(&storefront.snapshot());
    Ok(())
}
