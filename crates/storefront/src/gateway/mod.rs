//! Remote gateway to the QKart backend.
//!
//! # Architecture
//!
//! - [`Gateway`] is the seam between the synchronization logic and the network;
//!   everything above it is tested against an in-memory fake
//! - [`HttpGateway`] talks REST/JSON over `reqwest`
//! - Backend is source of truth for the cart - NO local persistence
//! - Catalog responses may be cached via `moka` (cart responses never are)
//!
//! # Endpoints
//!
//! | Call | Method/Path | Auth |
//! |---|---|---|
//! | [`Gateway::fetch_products`] | `GET /products` | none |
//! | [`Gateway::search_products`] | `GET /products/search?value={q}` | none |
//! | [`Gateway::fetch_cart`] | `GET /cart` | Bearer |
//! | [`Gateway::update_cart`] | `POST /cart` `{productId, qty}` | Bearer |

mod cache;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use std::future::Future;

use qkart_core::{AuthToken, Notification, Product, ProductId, RawCartLine};
use serde::Deserialize;
use thiserror::Error;

pub use http::HttpGateway;

/// Fallback shown when the backend rejects a credential without saying why.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the credential (400/401 on cart calls).
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("no message"))]
    Unauthorized(Option<String>),

    /// Resource not found (404).
    #[error("Not found: {}", .0.as_deref().unwrap_or("no message"))]
    NotFound(Option<String>),

    /// Any other non-success status.
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if present.
        message: Option<String>,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl GatewayError {
    /// Whether this is a connectivity-class failure (not a backend verdict).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Parse(_) | Self::Url(_)
        )
    }

    /// User-facing notification for this failure.
    ///
    /// Auth failures carry the backend's message when it sent one, 404s carry
    /// theirs (e.g. "Product doesn't exist"); everything else falls back to
    /// `generic`.
    #[must_use]
    pub fn notification(&self, generic: &str) -> Notification {
        match self {
            Self::Unauthorized(message) => {
                Notification::error(message.as_deref().unwrap_or(SESSION_EXPIRED_MESSAGE))
            }
            Self::NotFound(Some(message)) => Notification::error(message.as_str()),
            _ => Notification::error(generic),
        }
    }
}

/// Error body returned by the backend on failure.
///
/// ```json
/// { "success": false, "message": "Protected route, Oauth2 Bearer token not found" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// Network contract consumed by the catalog fetcher, cart synchronizer and
/// add/update coordinator.
///
/// Implementations must not retry; every failure is surfaced to the caller.
pub trait Gateway: Send + Sync + 'static {
    /// `GET /products`.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send;

    /// `GET /products/search?value={query}`.
    ///
    /// Zero matches is reported by the backend as a 404, which surfaces here
    /// as [`GatewayError::NotFound`].
    fn search_products(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send;

    /// `GET /cart` with a bearer credential.
    fn fetch_cart(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<RawCartLine>, GatewayError>> + Send;

    /// `POST /cart` with a bearer credential.
    ///
    /// Sets the product's quantity to `quantity` (absolute, not a delta) and
    /// returns the backend's full cart afterwards.
    fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<Vec<RawCartLine>, GatewayError>> + Send;
}
