//! Order handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{NewOrderItem, Order, OrderDetail};
use crate::services::OrderService;
use crate::state::AppState;

/// Order creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<NewOrderItem>,
}

/// Order listing response body.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderDetail>,
}

/// List the caller's orders, newest first.
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<OrdersResponse>> {
    let orders = OrderService::new(state.pool()).list_orders(&user).await?;
    Ok(Json(OrdersResponse { orders }))
}

/// Place an order owned by the caller.
///
/// The owner always comes from the session token, never from the body.
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(request) = payload?;

    let order = OrderService::new(state.pool())
        .create_order(&user, &request.items)
        .await?;

    tracing::info!(order_id = %order.id, user = %user, "Order placed");
    Ok((StatusCode::CREATED, Json(order)))
}
