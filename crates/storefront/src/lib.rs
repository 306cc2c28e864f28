//! QKart storefront client library.
//!
//! Keeps a shopper's product catalog and shopping cart in sync with the
//! QKart backend:
//!
//! - [`catalog`]: full and filtered catalog fetches, last-issued-wins tagging
//! - [`debounce`]: coalesces search keystrokes into one request
//! - [`cart`]: joins the backend's raw cart with the catalog
//! - [`coordinator`]: validated add/update cart mutations
//! - [`state`]: the [`Storefront`] orchestrator owning the session state
//!
//! All network access goes through the [`Gateway`] trait; [`HttpGateway`] is
//! the REST implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod state;

pub use config::{BackendConfig, ConfigError, SessionConfig, StorefrontConfig};
pub use coordinator::{MutationOptions, MutationOutcome};
pub use gateway::{Gateway, GatewayError, HttpGateway};
pub use notify::Notifier;
pub use state::{SessionState, Storefront};
