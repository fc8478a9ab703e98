//! Routing module for the shopping cart application

use crate::cart::{identity::attach_identity, state::SharedState};
use axum::{body::Body, extract::Request, middleware::Next, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: one span per request, tagged with a fresh request id
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let request_id = Uuid::new_v4().simple().to_string();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            uri = %req.uri()
        );

        async move {
            tracing::info!("request received");
            let res = next.run(req).await;
            if res.status().is_success() {
                tracing::info!(status = %res.status(), "request completed");
            } else {
                tracing::warn!(status = %res.status(), "request failed");
            }
            res
        }
        .instrument(span)
        .await
    });

    // Middleware: CORS (Permissive for local dev)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The identity layer only wraps cart routes; health stays anonymous.
    let cart_routes = crate::cart::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        attach_identity,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(cart_routes)
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}

/// Endpoint: GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
