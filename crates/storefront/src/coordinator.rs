//! Add/update coordination for cart mutations.
//!
//! Flow for every mutation:
//! 1. Without a credential, warn "login required" and stop
//! 2. For catalog "add" actions (`prevent_duplicate`), stop with a warning if
//!    the product already has a cart line
//! 3. Submit `{productId, qty}` to the backend
//! 4. Merge the returned raw cart with the catalog
//!
//! Guards run before any network call. Nothing is applied optimistically and
//! nothing is retried: the cart only ever reflects a backend-confirmed state.

use qkart_core::{AuthToken, EnrichedCartLine, Product, ProductId, RawCartLine};
use tracing::{info, instrument};

use crate::cart::{is_in_cart, merge};
use crate::error::report;
use crate::gateway::Gateway;
use crate::notify::{ALREADY_IN_CART, CART_UPDATE_FAILED, LOGIN_REQUIRED, Notifier};

/// Options for [`add_or_update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationOptions {
    /// Refuse to touch a product that is already in the cart.
    ///
    /// Set for catalog "add" buttons, cleared for the in-cart quantity
    /// stepper, which must be able to update an existing line.
    pub prevent_duplicate: bool,
}

impl MutationOptions {
    /// Options for an "add to cart" action from the catalog.
    pub const ADD: Self = Self {
        prevent_duplicate: true,
    };

    /// Options for a quantity change from the cart panel.
    pub const SET_QUANTITY: Self = Self {
        prevent_duplicate: false,
    };
}

/// Result of a cart mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the mutation.
    Updated {
        /// Authoritative raw cart returned by the backend.
        raw_cart: Vec<RawCartLine>,
        /// `raw_cart` merged with the catalog passed in.
        cart: Vec<EnrichedCartLine>,
    },
    /// No credential; nothing was sent.
    LoginRequired,
    /// Duplicate add; nothing was sent.
    AlreadyInCart,
    /// The backend call failed; the user was notified.
    Failed,
}

impl MutationOutcome {
    /// Whether a network call was made and succeeded.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Validate and submit a cart mutation.
///
/// `quantity` is the absolute number of units the line should have. On
/// success the returned cart replaces the caller's cart; on any other
/// outcome the caller's cart must stay as it is.
#[instrument(skip(gateway, notifier, token, current_cart, catalog), fields(product_id = %product_id))]
#[allow(clippy::too_many_arguments)]
pub async fn add_or_update<G: Gateway>(
    gateway: &G,
    notifier: &Notifier,
    token: Option<&AuthToken>,
    current_cart: &[EnrichedCartLine],
    catalog: &[Product],
    product_id: &ProductId,
    quantity: u32,
    options: MutationOptions,
) -> MutationOutcome {
    let Some(token) = token else {
        notifier.warning(LOGIN_REQUIRED);
        return MutationOutcome::LoginRequired;
    };

    if options.prevent_duplicate && is_in_cart(current_cart, product_id) {
        notifier.warning(ALREADY_IN_CART);
        return MutationOutcome::AlreadyInCart;
    }

    match gateway.update_cart(token, product_id, quantity).await {
        Ok(raw_cart) => {
            info!(lines = raw_cart.len(), "Cart updated");
            let cart = merge(&raw_cart, catalog);
            MutationOutcome::Updated { raw_cart, cart }
        }
        Err(e) => {
            report(notifier, &e, CART_UPDATE_FAILED);
            MutationOutcome::Failed
        }
    }
}
