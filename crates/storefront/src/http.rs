//! `reqwest`-backed storefront client.

use async_trait::async_trait;
use serde::Deserialize;

use quickbuy_catalog::Product;
use quickbuy_core::ProductHandle;

use crate::api::StorefrontApi;
use crate::cart::{CartAddRequest, CartAddResponse};
use crate::error::StorefrontError;

/// Client for a live storefront's AJAX endpoints.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    base_url: String,
    client: reqwest::Client,
}

/// Error payload the cart endpoint sends with a 4xx.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl HttpStorefront {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_url(&self, handle: &ProductHandle) -> String {
        format!("{}/products/{}.js", self.base_url, handle)
    }

    fn cart_add_url(&self) -> String {
        format!("{}/cart/add.js", self.base_url)
    }

    /// Map a non-success response. The description stays empty when the body
    /// carries none, so callers can substitute their own wording.
    async fn failure(resp: reqwest::Response) -> StorefrontError {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let description = body
            .description
            .or(body.message)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_default();
        StorefrontError::api(status, description)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefront {
    async fn fetch_product(&self, handle: &ProductHandle) -> Result<Product, StorefrontError> {
        let url = self.product_url(handle);
        tracing::debug!(%url, "fetching product");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| StorefrontError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| StorefrontError::Network(e.to_string()))?;
        Product::from_json(&bytes).map_err(|e| StorefrontError::Parse(e.to_string()))
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<CartAddResponse, StorefrontError> {
        let url = self.cart_add_url();
        tracing::debug!(%url, lines = request.lines().len(), "posting cart add");

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| StorefrontError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }

        resp.json::<CartAddResponse>()
            .await
            .map_err(|e| StorefrontError::Parse(e.to_string()))
    }
}
