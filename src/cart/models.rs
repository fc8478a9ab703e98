//! Shopping Cart Domain Models
//!
//! This module contains the request payloads, read models and identifiers
//! exchanged between the HTTP handlers and the cart service.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::helpers::field_error_message;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a catalog product
    ProductId
);
id_type!(
    /// Identifier of a single line in a user's cart
    CartItemId
);
id_type!(
    /// Identifier of a placed order
    OrderId
);

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /cart`
///
/// Both fields are optional at the serde level so that a missing field is
/// reported through validation alongside every other field error, instead of
/// failing deserialization on the first one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    /// Product to put in the cart
    #[validate(required(message = "product id is required"))]
    pub product_id: Option<u64>,

    /// How many units to add
    #[validate(
        required(message = "quantity is required"),
        range(min = 1, message = "quantity must be at least 1")
    )]
    pub quantity: Option<i64>,
}

/// A cart item request that passed structural validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItemRequest {
    /// Validates the request and converts it into a [`NewCartItem`].
    ///
    /// On failure the messages of every violated field are joined into a
    /// single string.
    pub fn into_new_item(self) -> Result<NewCartItem, String> {
        self.validate().map_err(|errors| field_error_message(&errors))?;

        let (Some(product_id), Some(quantity)) = (self.product_id, self.quantity) else {
            return Err("product id and quantity are required".to_string());
        };
        let quantity = u32::try_from(quantity)
            .map_err(|_| format!("quantity must not exceed {}", u32::MAX))?;

        Ok(NewCartItem {
            product_id: ProductId(product_id),
            quantity,
        })
    }
}

/// `count` parameter of `PATCH /cartItem/{id}`, read from the query string
/// or a url-encoded form body
#[derive(Debug, Deserialize)]
pub struct CountParams {
    pub count: Option<i64>,
}

/// One selected line in an order request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOrderItem {
    pub cart_item_id: CartItemId,
}

/// Body of `POST /cart/orders`
#[derive(Debug, Default, Deserialize)]
pub struct CartOrderRequest {
    /// Selected cart lines; absent is treated like an empty selection
    pub items: Option<Vec<CartOrderItem>>,
}

// =============================================================================
// Read models
// =============================================================================

/// One row of the caller's cart listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDetail {
    pub cart_item_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit price in minor currency units
    pub price: u64,
    pub quantity: u32,
}

/// Response for `GET /cart`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartListResponse {
    pub cart_items: Vec<CartDetail>,
}
