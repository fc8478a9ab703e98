//! Shopping Cart State Management
//!
//! This module holds the state shared by every cart request: the service
//! collaborator and the name of the header carrying the caller identity.

use super::service::CartService;
use axum::http::HeaderName;
use std::sync::Arc;

/// Header used when no other one is configured
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-email";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    /// Business logic and persistence for carts and orders
    pub service: Arc<dyn CartService>,

    /// Header the upstream authentication layer writes the caller email to
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(service: Arc<dyn CartService>, identity_header: HeaderName) -> Self {
        Self {
            service,
            identity_header,
        }
    }
}
