//! REST API handlers for shopping cart operations
//!
//! Each handler validates its input, checks that the caller owns the cart
//! lines it touches, delegates to the [`CartService`](super::service::CartService)
//! and maps the outcome to a status code.

use super::{identity::Identity, models::*, state::SharedState};
use crate::error::{AppError, Result};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Form, Path, Query, State,
    },
    routing::{patch, post},
    Json, Router,
};
use tracing::{info, instrument};

/// Rejection for a non-positive count on update
pub const MIN_COUNT_MESSAGE: &str = "at least one item must remain in the cart";
/// Rejection when neither the query string nor a form body carries `count`
pub const MISSING_COUNT_MESSAGE: &str = "count is required";
/// Rejection when the caller does not own the line being changed
pub const EDIT_FORBIDDEN_MESSAGE: &str = "you are not allowed to modify this cart item";
/// Rejection for an order request without any selected line
pub const EMPTY_ORDER_MESSAGE: &str = "select at least one item to order";
/// Rejection when the caller does not own one of the lines being ordered
pub const ORDER_FORBIDDEN_MESSAGE: &str = "you are not allowed to order this cart item";

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", post(add_cart).get(cart_list))
        .route(
            "/cartItem/:cart_item_id",
            patch(update_cart_item).delete(delete_cart_item),
        )
        .route("/cart/orders", post(order_cart_items))
}

/// Fails with `403` and `message` unless the caller owns the cart line.
async fn ensure_owner(
    state: &SharedState,
    id: CartItemId,
    identity: &Identity,
    message: &str,
) -> Result<()> {
    if state.service.validate_cart_item(id, identity.email()).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

/// Endpoint: POST /cart
/// Adds a product to the caller's cart and returns the new cart line id.
#[instrument(name = "handler::add_cart", skip_all, fields(user = %identity))]
async fn add_cart(
    State(state): State<SharedState>,
    identity: Identity,
    payload: std::result::Result<Json<CartItemRequest>, JsonRejection>,
) -> Result<Json<CartItemId>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let item = request.into_new_item().map_err(AppError::BadRequest)?;

    // Every service failure on this path is reported as a bad request.
    let id = state
        .service
        .add_cart(item, identity.email())
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    info!(cart_item_id = %id, product_id = %item.product_id, quantity = item.quantity, "added to cart");
    Ok(Json(id))
}

/// Endpoint: GET /cart
/// Lists the caller's cart lines.
#[instrument(name = "handler::cart_list", skip_all, fields(user = %identity))]
async fn cart_list(
    State(state): State<SharedState>,
    identity: Identity,
) -> Result<Json<CartListResponse>> {
    let cart_items = state.service.cart_list(identity.email()).await?;
    Ok(Json(CartListResponse { cart_items }))
}

/// Picks `count` from the query string, falling back to a url-encoded form body.
fn resolve_count(
    query: std::result::Result<Query<CountParams>, QueryRejection>,
    form: std::result::Result<Form<CountParams>, FormRejection>,
) -> Result<i64> {
    let Query(CountParams { count }) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if let Some(count) = count {
        return Ok(count);
    }

    match form {
        Ok(Form(CountParams { count: Some(count) })) => Ok(count),
        Ok(_) | Err(FormRejection::InvalidFormContentType(_)) => {
            Err(AppError::BadRequest(MISSING_COUNT_MESSAGE.to_string()))
        }
        Err(e) => Err(AppError::BadRequest(e.body_text())),
    }
}

/// Endpoint: PATCH /cartItem/{id}
/// Sets the quantity of one of the caller's cart lines. `count` comes from
/// the query string or a form body.
#[instrument(name = "handler::update_cart_item", skip_all, fields(user = %identity, cart_item_id = tracing::field::Empty))]
async fn update_cart_item(
    State(state): State<SharedState>,
    identity: Identity,
    Path(cart_item_id): Path<u64>,
    query: std::result::Result<Query<CountParams>, QueryRejection>,
    form: std::result::Result<Form<CountParams>, FormRejection>,
) -> Result<Json<CartItemId>> {
    let id = CartItemId(cart_item_id);
    tracing::Span::current().record("cart_item_id", cart_item_id);

    let count = resolve_count(query, form)?;
    if count <= 0 {
        return Err(AppError::BadRequest(MIN_COUNT_MESSAGE.to_string()));
    }
    let count = u32::try_from(count)
        .map_err(|_| AppError::BadRequest(format!("count must not exceed {}", u32::MAX)))?;

    ensure_owner(&state, id, &identity, EDIT_FORBIDDEN_MESSAGE).await?;
    state.service.update_cart_item_count(id, count).await?;

    info!(count, "cart line updated");
    Ok(Json(id))
}

/// Endpoint: DELETE /cartItem/{id}
/// Removes one of the caller's cart lines.
#[instrument(name = "handler::delete_cart_item", skip_all, fields(user = %identity, cart_item_id = tracing::field::Empty))]
async fn delete_cart_item(
    State(state): State<SharedState>,
    identity: Identity,
    Path(cart_item_id): Path<u64>,
) -> Result<Json<CartItemId>> {
    let id = CartItemId(cart_item_id);
    tracing::Span::current().record("cart_item_id", cart_item_id);

    ensure_owner(&state, id, &identity, EDIT_FORBIDDEN_MESSAGE).await?;
    state.service.delete_cart_item(id).await?;

    info!("cart line deleted");
    Ok(Json(id))
}

/// Endpoint: POST /cart/orders
/// Places an order for the selected cart lines.
///
/// Ownership of every selected line is checked before the service is asked to
/// check out, so a single foreign line rejects the whole request.
#[instrument(name = "handler::order_cart_items", skip_all, fields(user = %identity))]
async fn order_cart_items(
    State(state): State<SharedState>,
    identity: Identity,
    payload: std::result::Result<Json<CartOrderRequest>, JsonRejection>,
) -> Result<Json<OrderId>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let selections = request.items.unwrap_or_default();

    // Kept as 403 for compatibility with existing clients.
    if selections.is_empty() {
        return Err(AppError::Forbidden(EMPTY_ORDER_MESSAGE.to_string()));
    }

    for selection in &selections {
        ensure_owner(&state, selection.cart_item_id, &identity, ORDER_FORBIDDEN_MESSAGE).await?;
    }

    let order_id = state
        .service
        .order_cart_items(&selections, identity.email())
        .await?;

    info!(order_id = %order_id, lines = selections.len(), "order placed from cart");
    Ok(Json(order_id))
}
