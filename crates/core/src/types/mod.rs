//! Core types for QKart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod credential;
pub mod id;
pub mod notification;
pub mod price;
pub mod product;
pub mod rating;

pub use cart::{EnrichedCartLine, RawCartLine};
pub use credential::AuthToken;
pub use id::*;
pub use notification::{Notification, Severity};
pub use price::{Price, PriceError};
pub use product::Product;
pub use rating::{Rating, RatingError};
