//! REST implementation of the [`Gateway`] contract.
//!
//! Uses `reqwest` for HTTP and `serde_json` for bodies. Catalog responses are
//! optionally cached with `moka`; cart calls always go to the backend.

use std::sync::Arc;

use qkart_core::{AuthToken, Product, ProductId, RawCartLine};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::BackendConfig;

use super::cache::{CacheKey, CatalogCache, catalog_cache};
use super::{ErrorBody, Gateway, GatewayError};

/// Number of body characters kept in logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// HttpGateway
// =============================================================================

/// Client for the QKart backend REST API.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Option<CatalogCache>,
}

/// Body of `POST /cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartMutationBody<'a> {
    product_id: &'a ProductId,
    qty: u32,
}

impl HttpGateway {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner {
                client,
                base_url: config.base_url.clone(),
                cache: config.catalog_cache_ttl.map(catalog_cache),
            }),
        })
    }

    /// Build the URL of an endpoint below the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send a request and decode a successful JSON response.
    ///
    /// `authenticated` marks calls carrying a bearer credential; only those
    /// can fail with [`GatewayError::Unauthorized`].
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        authenticated: bool,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &response_text, authenticated));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&response_text),
                "Failed to parse backend response"
            );
            GatewayError::Parse(e)
        })
    }

    /// Look up a catalog response in the cache, if caching is enabled.
    async fn cached(&self, key: &CacheKey) -> Option<Vec<Product>> {
        let products = self.inner.cache.as_ref()?.get(key).await?;
        debug!(?key, "Cache hit for catalog");
        Some(products)
    }

    /// Store a catalog response in the cache, if caching is enabled.
    async fn remember(&self, key: CacheKey, products: &[Product]) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, products.to_vec()).await;
        }
    }

    /// Invalidate all cached catalog responses.
    pub async fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }
}

impl Gateway for HttpGateway {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError> {
        let key = CacheKey::AllProducts;
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let url = self.endpoint("products")?;
        let products: Vec<Product> = self.execute(self.inner.client.get(url), false).await?;
        debug!(count = products.len(), "Fetched catalog");

        self.remember(key, &products).await;
        Ok(products)
    }

    #[instrument(skip(self), fields(query = %query))]
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, GatewayError> {
        let key = CacheKey::Search(query.to_string());
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let mut url = self.endpoint("products/search")?;
        url.query_pairs_mut().append_pair("value", query);

        let products: Vec<Product> = self.execute(self.inner.client.get(url), false).await?;
        debug!(count = products.len(), "Fetched search results");

        self.remember(key, &products).await;
        Ok(products)
    }

    #[instrument(skip(self, token))]
    async fn fetch_cart(&self, token: &AuthToken) -> Result<Vec<RawCartLine>, GatewayError> {
        let url = self.endpoint("cart")?;
        let request = self.inner.client.get(url).bearer_auth(token.expose());

        self.execute(request, true).await
    }

    #[instrument(skip(self, token), fields(product_id = %product_id))]
    async fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<RawCartLine>, GatewayError> {
        let url = self.endpoint("cart")?;
        let request = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose())
            .json(&CartMutationBody {
                product_id,
                qty: quantity,
            });

        self.execute(request, true).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a non-success status and its body to a [`GatewayError`].
///
/// 400/401 mean a rejected credential only on authenticated calls; on the
/// public catalog endpoints they are ordinary failures.
fn classify_failure(status: StatusCode, body: &str, authenticated: bool) -> GatewayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message);

    match status {
        StatusCode::NOT_FOUND => {
            debug!(body = %truncate(body), "Backend returned 404");
            GatewayError::NotFound(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED if authenticated => {
            warn!(status = %status, body = %truncate(body), "Backend rejected credential");
            GatewayError::Unauthorized(message)
        }
        _ => {
            error!(
                status = %status,
                body = %truncate(body),
                "Backend returned non-success status"
            );
            GatewayError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
