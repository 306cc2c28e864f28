//! In-memory [`Gateway`] used by unit tests.
//!
//! Behaves like the backend: `update_cart` sets absolute quantities, removes
//! lines set to zero and rejects unknown products with a 404. Every call is
//! counted so tests can assert that guards never reach the network.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use qkart_core::{AuthToken, Price, Product, ProductId, RawCartLine, Rating};
use tokio::sync::Notify;

use super::{Gateway, GatewayError};

/// Failure the fake should answer with.
#[derive(Debug, Clone)]
pub enum FakeFailure {
    NotFound(Option<String>),
    Unauthorized(Option<String>),
    Status(u16),
}

impl From<FakeFailure> for GatewayError {
    fn from(failure: FakeFailure) -> Self {
        match failure {
            FakeFailure::NotFound(m) => Self::NotFound(m),
            FakeFailure::Unauthorized(m) => Self::Unauthorized(m),
            FakeFailure::Status(status) => Self::Status {
                status,
                message: None,
            },
        }
    }
}

#[derive(Default)]
struct FakeState {
    products: Mutex<Vec<Product>>,
    products_failure: Mutex<Option<FakeFailure>>,
    search_results: Mutex<HashMap<String, Vec<Product>>>,
    search_failure: Mutex<Option<FakeFailure>>,
    search_gates: Mutex<HashMap<String, Arc<Notify>>>,
    products_gate: Mutex<Option<Arc<Notify>>>,
    searched: Mutex<Vec<String>>,
    cart: Mutex<Vec<RawCartLine>>,
    cart_failure: Mutex<Option<FakeFailure>>,
    update_failure: Mutex<Option<FakeFailure>>,
    fetch_products_calls: AtomicUsize,
    search_calls: AtomicUsize,
    fetch_cart_calls: AtomicUsize,
    update_cart_calls: AtomicUsize,
}

/// Shared-state fake backend. Clones observe the same state.
#[derive(Clone, Default)]
pub struct FakeGateway {
    state: Arc<FakeState>,
}

impl FakeGateway {
    pub fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::default();
        *gateway.state.products.lock().unwrap() = products;
        gateway
    }

    pub fn set_cart(&self, cart: Vec<RawCartLine>) {
        *self.state.cart.lock().unwrap() = cart;
    }

    pub fn cart(&self) -> Vec<RawCartLine> {
        self.state.cart.lock().unwrap().clone()
    }

    pub fn set_search_results(&self, query: &str, products: Vec<Product>) {
        self.state
            .search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), products);
    }

    /// Hold responses for `query` until the returned handle is notified.
    pub fn gate_search(&self, query: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .search_gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::clone(&gate));
        gate
    }

    /// Hold `fetch_products` responses until the returned handle is notified.
    pub fn gate_products(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.state.products_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_products(&self, failure: FakeFailure) {
        *self.state.products_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_search(&self, failure: FakeFailure) {
        *self.state.search_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_cart(&self, failure: FakeFailure) {
        *self.state.cart_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_update(&self, failure: FakeFailure) {
        *self.state.update_failure.lock().unwrap() = Some(failure);
    }

    pub fn searched(&self) -> Vec<String> {
        self.state.searched.lock().unwrap().clone()
    }

    pub fn fetch_products_calls(&self) -> usize {
        self.state.fetch_products_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.state.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_cart_calls(&self) -> usize {
        self.state.fetch_cart_calls.load(Ordering::SeqCst)
    }

    pub fn update_cart_calls(&self) -> usize {
        self.state.update_cart_calls.load(Ordering::SeqCst)
    }

    /// Total number of network calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.fetch_products_calls()
            + self.search_calls()
            + self.fetch_cart_calls()
            + self.update_cart_calls()
    }
}

impl Gateway for FakeGateway {
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError> {
        self.state.fetch_products_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.state.products_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(failure) = self.state.products_failure.lock().unwrap().clone() {
            return Err(failure.into());
        }
        Ok(self.state.products.lock().unwrap().clone())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, GatewayError> {
        self.state.search_calls.fetch_add(1, Ordering::SeqCst);
        self.state.searched.lock().unwrap().push(query.to_string());

        let gate = self.state.search_gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(failure) = self.state.search_failure.lock().unwrap().clone() {
            return Err(failure.into());
        }
        self.state
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .ok_or(GatewayError::NotFound(None))
    }

    async fn fetch_cart(&self, _token: &AuthToken) -> Result<Vec<RawCartLine>, GatewayError> {
        self.state.fetch_cart_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.state.cart_failure.lock().unwrap().clone() {
            return Err(failure.into());
        }
        Ok(self.cart())
    }

    async fn update_cart(
        &self,
        _token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<RawCartLine>, GatewayError> {
        self.state.update_cart_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.state.update_failure.lock().unwrap().clone() {
            return Err(failure.into());
        }

        let known = self
            .state
            .products
            .lock()
            .unwrap()
            .iter()
            .any(|p| &p.id == product_id);
        if !known {
            return Err(GatewayError::NotFound(Some(
                "Product doesn't exist".to_string(),
            )));
        }

        let mut cart = self.state.cart.lock().unwrap();
        match cart.iter().position(|line| &line.product_id == product_id) {
            Some(index) if quantity == 0 => {
                cart.remove(index);
            }
            Some(index) => cart[index].quantity = quantity,
            None if quantity == 0 => {}
            None => cart.push(RawCartLine::new(product_id.clone(), quantity)),
        }
        Ok(cart.clone())
    }
}

/// Build a catalog product with sensible defaults.
pub fn product(id: &str, name: &str, cost: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: "Sports".to_string(),
        cost: Price::from_units(cost),
        rating: Rating::new(4).unwrap(),
        image: format!("https://i.imgur.com/{id}.jpg"),
    }
}

pub fn token() -> AuthToken {
    AuthToken::new("test-token").unwrap()
}
