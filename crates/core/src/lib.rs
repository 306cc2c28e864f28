//! QKart Core - Shared types library.
//!
//! This crate provides the types shared by every QKart component:
//! - `storefront` - Catalog fetching, cart synchronization and search debouncing
//! - `cli` - Command-line driver standing in for the presentation layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no timers.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, ratings, catalog and cart entities,
//!   credentials and user-facing notifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
