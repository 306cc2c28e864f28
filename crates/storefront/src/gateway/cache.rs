//! Cache types for catalog responses.

use std::time::Duration;

use moka::future::Cache;
use qkart_core::Product;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    AllProducts,
    Search(String),
}

/// Catalog response cache. Cart responses are never cached.
pub type CatalogCache = Cache<CacheKey, Vec<Product>>;

/// Build a catalog cache with the given TTL.
pub fn catalog_cache(ttl: Duration) -> CatalogCache {
    Cache::builder().max_capacity(1000).time_to_live(ttl).build()
}
