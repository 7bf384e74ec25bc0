use std::sync::Arc;

use async_trait::async_trait;

use quickbuy_catalog::Product;
use quickbuy_core::ProductHandle;

use crate::cart::{CartAddRequest, CartAddResponse};
use crate::error::StorefrontError;

/// The two storefront endpoints the modal depends on.
///
/// Both are collaborator-owned: the modal only reads products and appends to
/// the cart. No retries happen at this layer.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /products/{handle}.js`
    async fn fetch_product(&self, handle: &ProductHandle) -> Result<Product, StorefrontError>;

    /// `POST /cart/add.js`
    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<CartAddResponse, StorefrontError>;
}

#[async_trait]
impl<T> StorefrontApi for Arc<T>
where
    T: StorefrontApi + ?Sized,
{
    async fn fetch_product(&self, handle: &ProductHandle) -> Result<Product, StorefrontError> {
        (**self).fetch_product(handle).await
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<CartAddResponse, StorefrontError> {
        (**self).add_to_cart(request).await
    }
}
