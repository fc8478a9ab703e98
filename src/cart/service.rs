//! Cart Service Contract
//!
//! The HTTP handlers never touch storage directly. Everything they need goes
//! through [`CartService`], which keeps the handler layer independent from the
//! persistence strategy behind it.

use super::models::{CartDetail, CartItemId, CartOrderItem, NewCartItem, OrderId, ProductId};
use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Failures reported by a [`CartService`].
///
/// Messages are written to be shown to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("product {0} does not exist")]
    ProductNotFound(ProductId),

    #[error("cart item {0} does not exist")]
    CartItemNotFound(CartItemId),

    #[error("not enough stock for {product_name} (remaining: {remaining})")]
    OutOfStock {
        product_id: ProductId,
        product_name: String,
        remaining: u32,
    },
}

impl ServiceError {
    /// HTTP status this error maps to outside the add-to-cart path
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::ProductNotFound(_) | ServiceError::CartItemNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::OutOfStock { .. } => StatusCode::CONFLICT,
        }
    }
}

/// Business operations behind the cart endpoints.
///
/// `email` is always the authenticated caller, never a value taken from a
/// request body.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Puts a product in the caller's cart and returns the new cart line id.
    async fn add_cart(&self, item: NewCartItem, email: &str) -> Result<CartItemId, ServiceError>;

    /// Lists every line in the caller's cart.
    async fn cart_list(&self, email: &str) -> Result<Vec<CartDetail>, ServiceError>;

    /// Returns whether `email` owns the cart line.
    async fn validate_cart_item(&self, id: CartItemId, email: &str)
        -> Result<bool, ServiceError>;

    async fn update_cart_item_count(&self, id: CartItemId, count: u32)
        -> Result<(), ServiceError>;

    async fn delete_cart_item(&self, id: CartItemId) -> Result<(), ServiceError>;

    /// Converts the selected cart lines into an order and returns its id.
    async fn order_cart_items(
        &self,
        selections: &[CartOrderItem],
        email: &str,
    ) -> Result<OrderId, ServiceError>;
}
