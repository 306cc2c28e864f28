//! Catalog product type.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Rating};

/// A purchasable item as returned by `GET /products`.
///
/// Products are immutable once fetched; a catalog fetch replaces the whole
/// list rather than patching individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Name or title of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Price to buy one unit.
    pub cost: Price,
    /// Aggregate rating out of five.
    pub rating: Rating,
    /// URL of the product image.
    pub image: String,
}
