//! Order API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/order/create | POST | create order |
//! | /api/orders | GET | list orders, newest first |
//! | /api/order/:id | GET | read order |
//! | /api/order/:id | DELETE | delete order |
//! | /api/order/:id/status | PUT | set lifecycle status |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/order/create", post(handler::create))
        .route("/api/orders", get(handler::list))
        .route(
            "/api/order/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
        .route("/api/order/{id}/status", put(handler::update_status))
}
