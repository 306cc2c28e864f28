//! Session state and the storefront orchestrator that owns it.
//!
//! [`Storefront`] is the single owner of [`SessionState`]. The catalog
//! fetcher, cart synchronizer and add/update coordinator compute results;
//! only the orchestrator applies them. The presentation layer observes state
//! through a `watch` receiver and notifications through the notifier channel.

use std::sync::Arc;
use std::time::Duration;

use qkart_core::{AuthToken, EnrichedCartLine, Price, Product, ProductId, RawCartLine};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::cart::{self, merge};
use crate::catalog::{self, RequestSequence, RequestTag};
use crate::config::SessionConfig;
use crate::coordinator::{self, MutationOptions, MutationOutcome};
use crate::debounce::SearchDebouncer;
use crate::error::{add_breadcrumb, report, set_sentry_user};
use crate::gateway::Gateway;
use crate::notify::{BACKEND_UNREACHABLE, Notifier};

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current full or filtered catalog.
    pub catalog: Vec<Product>,
    /// Cart lines joined with `catalog`.
    pub cart: Vec<EnrichedCartLine>,
    /// Whether a catalog request is in flight.
    pub is_loading: bool,
    /// Last raw cart confirmed by the backend, kept to re-merge on catalog changes.
    pub raw_cart: Vec<RawCartLine>,
    /// Logged-in username, if any.
    pub username: Option<String>,
}

impl SessionState {
    /// Whether the cart panel should be shown (only for logged-in users).
    #[must_use]
    pub const fn cart_visible(&self) -> bool {
        self.username.is_some()
    }

    /// Whether to show the "No products found" placeholder.
    #[must_use]
    pub fn no_products(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Cart total, or `None` on overflow.
    #[must_use]
    pub fn cart_total(&self) -> Option<Price> {
        cart::cart_total(&self.cart)
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        cart::cart_item_count(&self.cart)
    }
}

/// Storefront session orchestrator.
///
/// This struct is cheaply cloneable via `Arc`; clones drive the same session.
pub struct Storefront<G> {
    inner: Arc<StorefrontInner<G>>,
}

struct StorefrontInner<G> {
    gateway: G,
    token: Option<AuthToken>,
    notifier: Notifier,
    state: watch::Sender<SessionState>,
    debouncer: SearchDebouncer,
    catalog_requests: RequestSequence,
}

impl<G> Clone for Storefront<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: Gateway> Storefront<G> {
    /// Create a new session.
    ///
    /// The credential in `session` is sourced once here and passed explicitly
    /// into every cart call.
    #[must_use]
    pub fn new(
        gateway: G,
        session: SessionConfig,
        search_debounce: Duration,
        notifier: Notifier,
    ) -> Self {
        if let Some(username) = session.username.as_deref() {
            set_sentry_user(username);
        }

        let (state, _) = watch::channel(SessionState {
            username: session.username,
            ..SessionState::default()
        });

        Self {
            inner: Arc::new(StorefrontInner {
                gateway,
                token: session.token,
                notifier,
                state,
                debouncer: SearchDebouncer::new(search_debounce),
                catalog_requests: RequestSequence::new(),
            }),
        }
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Whether the session has a credential.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Get a reference to the gateway.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.inner.gateway
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Initial load: fetch the full catalog, then the user's cart.
    ///
    /// `is_loading` is set for the duration and cleared even on failure. The
    /// cart is fetched after any successful catalog fetch, even one superseded
    /// by a search in the meantime; the cart is then merged with whichever
    /// catalog is current.
    #[instrument(skip(self))]
    pub async fn mount(&self) {
        let tag = self.begin_catalog_request();

        match catalog::fetch_all(&self.inner.gateway).await {
            Ok(products) => {
                let count = products.len();
                if self.apply_catalog(tag, products) {
                    info!(products = count, "Catalog loaded");
                }
                self.refresh_cart().await;
            }
            Err(e) => {
                if self.inner.catalog_requests.is_latest(tag) {
                    report(&self.inner.notifier, &e, BACKEND_UNREACHABLE);
                }
            }
        }

        self.finish_catalog_request(tag);
    }

    /// Feed raw search input; the search fires once input settles.
    ///
    /// A pending search does not keep the session alive: once every handle is
    /// dropped the timer is cancelled and nothing fires.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn search_input(&self, text: impl Into<String>) {
        let session = Arc::downgrade(&self.inner);
        self.inner
            .debouncer
            .keystroke(text.into(), move |text| async move {
                if let Some(inner) = session.upgrade() {
                    Self { inner }.search(&text).await;
                }
            });
    }

    /// Search immediately, bypassing the debouncer.
    ///
    /// Only the response to the most recently issued catalog request is
    /// applied; older responses that complete later are dropped.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) {
        add_breadcrumb("search", "Search catalog", Some(&[("text", text)]));
        let tag = self.begin_catalog_request();

        match catalog::fetch_filtered(&self.inner.gateway, text).await {
            Ok(products) => {
                self.apply_catalog(tag, products);
            }
            Err(e) => {
                if self.inner.catalog_requests.is_latest(tag) {
                    report(&self.inner.notifier, &e, BACKEND_UNREACHABLE);
                }
            }
        }

        self.finish_catalog_request(tag);
    }

    fn begin_catalog_request(&self) -> RequestTag {
        let tag = self.inner.catalog_requests.issue();
        self.inner.state.send_if_modified(|state| {
            let changed = !state.is_loading;
            state.is_loading = true;
            changed
        });
        tag
    }

    /// Replace the catalog if `tag` is still the latest request.
    ///
    /// The cart is re-merged against the new catalog in the same update, so
    /// observers never see a cart referring to products that are not shown.
    fn apply_catalog(&self, tag: RequestTag, products: Vec<Product>) -> bool {
        let requests = &self.inner.catalog_requests;
        self.inner.state.send_if_modified(|state| {
            if !requests.is_latest(tag) {
                debug!(?tag, "Dropping stale catalog response");
                return false;
            }
            state.catalog = products;
            state.cart = merge(&state.raw_cart, &state.catalog);
            true
        })
    }

    fn finish_catalog_request(&self, tag: RequestTag) {
        let requests = &self.inner.catalog_requests;
        self.inner.state.send_if_modified(|state| {
            if !requests.is_latest(tag) || !state.is_loading {
                return false;
            }
            state.is_loading = false;
            true
        });
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Re-fetch the cart from the backend and merge it with the catalog.
    ///
    /// Leaves the current cart untouched when the fetch fails or the session
    /// is anonymous.
    #[instrument(skip(self))]
    pub async fn refresh_cart(&self) {
        if let Some(raw_cart) = cart::fetch_cart_from_remote(
            &self.inner.gateway,
            &self.inner.notifier,
            self.inner.token.as_ref(),
        )
        .await
        {
            self.apply_raw_cart(raw_cart);
        }
    }

    /// "Add to cart" from the catalog: one unit, refused if already in the cart.
    pub async fn add_to_cart(&self, product_id: &ProductId) -> MutationOutcome {
        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));
        self.mutate(product_id, 1, MutationOptions::ADD).await
    }

    /// Quantity stepper in the cart panel: set an absolute quantity.
    ///
    /// A quantity of zero asks the backend to remove the line.
    pub async fn set_quantity(&self, product_id: &ProductId, quantity: u32) -> MutationOutcome {
        let quantity_text = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Change quantity",
            Some(&[
                ("product_id", product_id.as_str()),
                ("quantity", quantity_text.as_str()),
            ]),
        );
        self.mutate(product_id, quantity, MutationOptions::SET_QUANTITY)
            .await
    }

    async fn mutate(
        &self,
        product_id: &ProductId,
        quantity: u32,
        options: MutationOptions,
    ) -> MutationOutcome {
        let (current_cart, catalog) = {
            let state = self.inner.state.borrow();
            (state.cart.clone(), state.catalog.clone())
        };

        let outcome = coordinator::add_or_update(
            &self.inner.gateway,
            &self.inner.notifier,
            self.inner.token.as_ref(),
            &current_cart,
            &catalog,
            product_id,
            quantity,
            options,
        )
        .await;

        if let MutationOutcome::Updated { raw_cart, .. } = &outcome {
            self.apply_raw_cart(raw_cart.clone());
        }
        outcome
    }

    /// Replace the raw cart and re-merge it with the catalog current at the
    /// time of applying, which may be newer than the one the call started with.
    fn apply_raw_cart(&self, raw_cart: Vec<RawCartLine>) {
        self.inner.state.send_modify(|state| {
            state.cart = merge(&raw_cart, &state.catalog);
            state.raw_cart = raw_cart;
        });
    }
}
