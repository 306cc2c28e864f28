//! Cart line types.
//!
//! The backend only knows a cart as `(productId, qty)` pairs. The client joins
//! those pairs with the catalog to get lines it can actually display.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// A cart line as stored by the backend (`GET /cart`, `POST /cart`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCartLine {
    /// Product this line refers to.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// Number of units in the cart.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl RawCartLine {
    /// Create a raw cart line.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A cart line joined with its catalog product.
///
/// Only ever built in memory from a [`RawCartLine`] and a matching
/// [`Product`]; there is no way to have one without catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCartLine {
    /// Catalog data for the line.
    #[serde(flatten)]
    pub product: Product,
    /// Number of units in the cart.
    pub quantity: u32,
}

impl EnrichedCartLine {
    /// Join a product with a quantity.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// ID of the product on this line.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Cost of the whole line, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.cost.times(self.quantity)
    }
}
