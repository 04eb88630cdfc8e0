//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatusUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/order/create - create an order
///
/// Requires a complete customer block and a non-empty item list; the
/// created order always starts in the default initial status.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    payload
        .validate()
        .map_err(|_| AppError::validation("Missing required fields"))?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;

    tracing::info!(order_id = ?order.id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// GET /api/order/:id - read a single order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(order))
}

/// GET /api/orders - all orders, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// PUT /api/order/:id/status - set the lifecycle status
///
/// Values outside the enumerated state set are rejected at
/// deserialization before any lookup happens.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, payload.status).await?;

    Ok(Json(OrderResponse {
        message: "Order status updated".to_string(),
        order,
    }))
}

/// DELETE /api/order/:id - delete an order
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete(&id).await?;

    Ok(Json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
