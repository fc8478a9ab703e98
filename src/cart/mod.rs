//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart logic, including:
//! - Domain models (requests, read models, identifiers)
//! - Caller identity extraction
//! - The cart service contract and its in-memory implementation
//! - Application state
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod identity;
pub mod memory;
pub mod models;
pub mod service;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use identity::Identity;
pub use memory::InMemoryCartService;
pub use service::{CartService, ServiceError};
pub use state::{AppState, SharedState};
