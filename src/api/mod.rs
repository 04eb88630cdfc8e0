//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`products`] - product catalog: CRUD, listing, search, product of the year
//! - [`orders`] - order lifecycle
//!
//! The route table is assembled statically here at startup; handlers never
//! register themselves dynamically.

pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// The complete API route table
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(orders::router())
}
