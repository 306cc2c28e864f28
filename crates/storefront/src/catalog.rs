//! Catalog fetching.
//!
//! Retrieves the full product list (once, on mount) or a filtered one (from
//! the search debouncer). A search with zero matches is a valid empty
//! catalog, not a failure: the backend signals it with a 404, which is mapped
//! to `Ok(vec![])` here so callers only see real failures as errors.
//!
//! Catalog requests are not cancelled at the network layer, so responses can
//! arrive out of order. [`RequestSequence`] tags each request so the caller
//! can drop any response that is not from the latest issued request.

use std::sync::atomic::{AtomicU64, Ordering};

use qkart_core::Product;
use tracing::{debug, instrument};

use crate::gateway::{Gateway, GatewayError};

/// Fetch the full catalog.
///
/// # Errors
///
/// Returns the gateway error if the request fails.
#[instrument(skip(gateway))]
pub async fn fetch_all<G: Gateway>(gateway: &G) -> Result<Vec<Product>, GatewayError> {
    gateway.fetch_products().await
}

/// Fetch the products matching `text`.
///
/// The text is lowercased before transmission. A 404 from the backend means
/// "no matches" and yields an empty catalog.
///
/// # Errors
///
/// Returns the gateway error for any failure other than a 404.
#[instrument(skip(gateway))]
pub async fn fetch_filtered<G: Gateway>(
    gateway: &G,
    text: &str,
) -> Result<Vec<Product>, GatewayError> {
    let query = normalize_query(text);

    match gateway.search_products(&query).await {
        Err(GatewayError::NotFound(_)) => {
            debug!(query = %query, "No products match search");
            Ok(Vec::new())
        }
        result => result,
    }
}

/// Normalize raw search input for transmission.
#[must_use]
pub fn normalize_query(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// Request sequencing
// =============================================================================

/// Tag identifying one issued catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTag(u64);

/// Monotonic counter enforcing last-issued-wins for catalog responses.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    /// Create a sequence with no requests issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a new tag; every previously issued tag becomes stale.
    pub fn issue(&self) -> RequestTag {
        RequestTag(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `tag` is still the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, tag: RequestTag) -> bool {
        self.latest.load(Ordering::SeqCst) == tag.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::fake::{FakeFailure, FakeGateway, product};

    #[tokio::test]
    async fn test_fetch_all_returns_catalog() {
        let gateway = FakeGateway::with_products(vec![product("p1", "Ball", 10)]);

        let products = fetch_all(&gateway).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Ball");
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_server_error() {
        let gateway = FakeGateway::default();
        gateway.fail_products(FakeFailure::Status(500));

        let err = fetch_all(&gateway).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_filtered_lowercases_query() {
        let gateway = FakeGateway::default();
        gateway.set_search_results("ball", vec![product("p1", "Ball", 10)]);

        let products = fetch_filtered(&gateway, "BaLL").await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(gateway.searched(), vec!["ball".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_filtered_not_found_is_empty_catalog() {
        let gateway = FakeGateway::default();

        let products = fetch_filtered(&gateway, "nothing").await.unwrap();

        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_filtered_server_error_is_error() {
        let gateway = FakeGateway::default();
        gateway.fail_search(FakeFailure::Status(500));

        assert!(fetch_filtered(&gateway, "ball").await.is_err());
    }

    #[test]
    fn test_request_sequence_last_issued_wins() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        assert!(seq.is_latest(first));

        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        assert!(second > first);
    }
}
