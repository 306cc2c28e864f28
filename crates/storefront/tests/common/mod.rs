//! In-process QKart backend for integration tests.
//!
//! Serves the four REST endpoints the storefront client talks to on an
//! ephemeral localhost port, with the same status codes and error bodies as
//! the real backend.

#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use qkart_core::{Price, Product, ProductId, RawCartLine, Rating};
use qkart_storefront::BackendConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Token the fake backend accepts.
pub const VALID_TOKEN: &str = "valid-test-token";

type Reply<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

#[derive(Default)]
struct BackendState {
    products: Vec<Product>,
    carts: HashMap<String, Vec<RawCartLine>>,
}

/// Handle to a running fake backend.
#[derive(Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
    base_url: Url,
}

impl FakeBackend {
    /// Start a backend serving `products` under `/api/v1`.
    pub async fn start(products: Vec<Product>) -> Self {
        let state = Arc::new(Mutex::new(BackendState {
            products,
            carts: HashMap::new(),
        }));

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/cart", get(get_cart).post(update_cart))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}/api/v1")).unwrap(),
        }
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            catalog_cache_ttl: None,
        }
    }

    pub fn set_cart(&self, cart: Vec<RawCartLine>) {
        self.state
            .lock()
            .unwrap()
            .carts
            .insert(VALID_TOKEN.to_string(), cart);
    }

    pub fn cart(&self) -> Vec<RawCartLine> {
        self.state
            .lock()
            .unwrap()
            .carts
            .get(VALID_TOKEN)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_products(&self, products: Vec<Product>) {
        self.state.lock().unwrap().products = products;
    }
}

/// Build a catalog product.
pub fn product(id: &str, name: &str, category: &str, cost: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        cost: Price::from_units(cost),
        rating: Rating::new(5).unwrap(),
        image: format!("https://i.imgur.com/{id}.png"),
    }
}

/// A small catalog in the shape the backend seeds.
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product("BW0jAAeDJmlZCF8i", "Ball", "Sports", 10),
        product("KCRwjF7lN97HnEaY", "Basketball", "Sports", 48),
        product("a4sLtEcMpzabRyfx", "Bat", "Sports", 25),
        product("v4sLtEcMpzabRyfx", "iPhone XR", "Phones", 100),
    ]
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartMutation {
    product_id: String,
    qty: u32,
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

fn authorize(headers: &HeaderMap) -> Result<String, (StatusCode, Json<Value>)> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| *token == VALID_TOKEN)
        .map(ToString::to_string)
        .ok_or_else(|| {
            failure(
                StatusCode::UNAUTHORIZED,
                "Protected route, Oauth2 Bearer token not found",
            )
        })
}

async fn list_products(State(state): State<Arc<Mutex<BackendState>>>) -> Json<Vec<Product>> {
    Json(state.lock().unwrap().products.clone())
}

async fn search_products(
    State(state): State<Arc<Mutex<BackendState>>>,
    Query(params): Query<SearchParams>,
) -> Reply<Vec<Product>> {
    let matches: Vec<Product> = state
        .lock()
        .unwrap()
        .products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&params.value)
                || p.category.to_lowercase().contains(&params.value)
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return Err((StatusCode::NOT_FOUND, Json(json!([]))));
    }
    Ok(Json(matches))
}

async fn get_cart(
    State(state): State<Arc<Mutex<BackendState>>>,
    headers: HeaderMap,
) -> Reply<Vec<RawCartLine>> {
    let token = authorize(&headers)?;
    let cart = state
        .lock()
        .unwrap()
        .carts
        .get(&token)
        .cloned()
        .unwrap_or_default();
    Ok(Json(cart))
}

async fn update_cart(
    State(state): State<Arc<Mutex<BackendState>>>,
    headers: HeaderMap,
    Json(body): Json<CartMutation>,
) -> Reply<Vec<RawCartLine>> {
    let token = authorize(&headers)?;
    let mut state = state.lock().unwrap();

    if !state.products.iter().any(|p| p.id.as_str() == body.product_id) {
        return Err(failure(StatusCode::NOT_FOUND, "Product doesn't exist"));
    }

    let cart = state.carts.entry(token).or_default();
    match cart
        .iter()
        .position(|line| line.product_id.as_str() == body.product_id)
    {
        Some(index) if body.qty == 0 => {
            cart.remove(index);
        }
        Some(index) => cart[index].quantity = body.qty,
        None if body.qty == 0 => {}
        None => cart.push(RawCartLine::new(body.product_id, body.qty)),
    }
    Ok(Json(cart.clone()))
}
