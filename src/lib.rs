//! Shopping Cart Library
//!
//! HTTP endpoints for adding to, listing, editing and checking out a
//! user's shopping cart. Business rules live behind the
//! [`cart::CartService`] trait.

// Domain modules
pub mod cart;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
