//! In-memory storefront for tests/dev.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use quickbuy_catalog::Product;
use quickbuy_core::{ProductHandle, VariantId};

use crate::api::StorefrontApi;
use crate::cart::{AddedLine, CartAddRequest, CartAddResponse};
use crate::error::StorefrontError;

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductHandle, Product>,
    product_failures: HashMap<ProductHandle, StorefrontError>,
    rejected_variants: HashMap<VariantId, String>,
    cart_failure: Option<StorefrontError>,
    product_fetches: Vec<ProductHandle>,
    cart_requests: Vec<CartAddRequest>,
}

/// Scripted storefront.
///
/// - Products are served from an in-memory map; unknown handles are 404s
/// - Every request is recorded, in order, for assertions
/// - Failures can be injected per handle, per variant, or for the whole cart
#[derive(Debug, Default)]
pub struct InMemoryStorefront {
    state: Mutex<State>,
}

impl InMemoryStorefront {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded requests.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_product(&self, handle: ProductHandle, product: Product) {
        self.state().products.insert(handle, product);
    }

    /// Make `fetch_product(handle)` fail with `err`.
    pub fn fail_product(&self, handle: ProductHandle, err: StorefrontError) {
        self.state().product_failures.insert(handle, err);
    }

    /// Make any cart add containing `id` fail with a 422 carrying `description`.
    pub fn reject_variant(&self, id: VariantId, description: impl Into<String>) {
        self.state().rejected_variants.insert(id, description.into());
    }

    /// Make every cart add fail with `err` (e.g. a network error).
    pub fn fail_cart(&self, err: StorefrontError) {
        self.state().cart_failure = Some(err);
    }

    pub fn product_fetches(&self) -> Vec<ProductHandle> {
        self.state().product_fetches.clone()
    }

    pub fn cart_requests(&self) -> Vec<CartAddRequest> {
        self.state().cart_requests.clone()
    }
}

#[async_trait]
impl StorefrontApi for InMemoryStorefront {
    async fn fetch_product(&self, handle: &ProductHandle) -> Result<Product, StorefrontError> {
        let mut state = self.state();
        state.product_fetches.push(handle.clone());

        if let Some(err) = state.product_failures.get(handle) {
            return Err(err.clone());
        }
        state
            .products
            .get(handle)
            .cloned()
            .ok_or_else(|| StorefrontError::api(404, format!("product {handle} not found")))
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<CartAddResponse, StorefrontError> {
        let mut state = self.state();
        state.cart_requests.push(request.clone());

        if let Some(err) = &state.cart_failure {
            return Err(err.clone());
        }
        for line in request.lines() {
            if let Some(description) = state.rejected_variants.get(&line.id) {
                return Err(StorefrontError::api(422, description.clone()));
            }
        }

        let added: Vec<AddedLine> = request
            .lines()
            .iter()
            .map(|line| AddedLine {
                id: line.id,
                quantity: line.quantity.get(),
                key: Some(format!("{}:memory", line.id)),
                title: None,
                price: None,
            })
            .collect();

        Ok(match request {
            CartAddRequest::Single(_) => {
                CartAddResponse::Single(added.into_iter().next().ok_or_else(|| StorefrontError::data("empty cart add"))?)
            }
            CartAddRequest::Batch { .. } => CartAddResponse::Batch { items: added },
        })
    }
}
