//! Cart synchronization.
//!
//! The backend stores a cart as bare `(productId, qty)` pairs. [`merge`] joins
//! those pairs with the current catalog to produce display-ready lines; it is
//! re-run whenever either side changes.

use std::collections::HashMap;

use qkart_core::{AuthToken, EnrichedCartLine, Price, Product, ProductId, RawCartLine};
use tracing::{debug, instrument};

use crate::error::report;
use crate::gateway::Gateway;
use crate::notify::{CART_UNAVAILABLE, Notifier};

/// Join a raw cart with the catalog.
///
/// Output follows the order of `raw_cart` (the order the backend assigned),
/// not catalog order. Lines whose product is missing from `catalog` are
/// dropped: there is nothing to display for them.
#[must_use]
pub fn merge(raw_cart: &[RawCartLine], catalog: &[Product]) -> Vec<EnrichedCartLine> {
    let by_id: HashMap<&ProductId, &Product> = catalog.iter().map(|p| (&p.id, p)).collect();

    raw_cart
        .iter()
        .filter_map(|line| match by_id.get(&line.product_id) {
            Some(product) => Some(EnrichedCartLine::new((*product).clone(), line.quantity)),
            None => {
                debug!(product_id = %line.product_id, "Dropping cart line missing from catalog");
                None
            }
        })
        .collect()
}

/// Whether `product_id` already has a line in `cart`.
///
/// Carts hold tens of items at most, so a linear scan is enough.
#[must_use]
pub fn is_in_cart(cart: &[EnrichedCartLine], product_id: &ProductId) -> bool {
    cart.iter().any(|line| line.id() == product_id)
}

/// Sum of `cost * quantity` over the cart, or `None` on overflow.
#[must_use]
pub fn cart_total(cart: &[EnrichedCartLine]) -> Option<Price> {
    cart.iter()
        .map(EnrichedCartLine::line_total)
        .sum::<Option<Price>>()
}

/// Total number of units in the cart.
#[must_use]
pub fn cart_item_count(cart: &[EnrichedCartLine]) -> u64 {
    cart.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Fetch the user's raw cart from the backend.
///
/// Returns `None` for an anonymous session (no token) and on any failure,
/// after notifying the user: auth failures carry the backend's message,
/// everything else gets a generic connectivity message. Keeping the previous
/// cart on `None` is up to the caller.
#[instrument(skip_all)]
pub async fn fetch_cart_from_remote<G: Gateway>(
    gateway: &G,
    notifier: &Notifier,
    token: Option<&AuthToken>,
) -> Option<Vec<RawCartLine>> {
    let token = token?;

    match gateway.fetch_cart(token).await {
        Ok(raw_cart) => {
            debug!(lines = raw_cart.len(), "Fetched cart");
            Some(raw_cart)
        }
        Err(e) => {
            report(notifier, &e, CART_UNAVAILABLE);
            None
        }
    }
}
