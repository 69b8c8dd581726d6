//! Order JSON API handlers.
//!
//! - GET|POST /all_orders - List one business's orders
//! - GET|POST /add_order - Place an order
//! - GET|DELETE /delete_order - Delete one order

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    db::DbPool,
    error::AppError,
    handlers::SuccessResponse,
    middleware::auth::ApiKey,
    models::order::{AddOrderParams, DeleteOrderParams, OrderListParams, OrderResponse},
    services::order_service,
};

/// Body of `/all_orders`.
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderResponse>,
}

/// List the orders of one business.
///
/// A valid key whose business has no orders gets `{"orders": []}`; an unknown
/// key gets a 401.
pub async fn all_orders(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
    params: Result<Query<OrderListParams>, QueryRejection>,
) -> Result<Json<OrderList>, AppError> {
    let Query(params) = params?;

    let orders = order_service::list_orders(&pool, &api_key, &params.business_name).await?;

    Ok(Json(OrderList {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

/// Place an order for one of the key's businesses.
///
/// # Response
///
/// - **Success (201 Created)**: `{"Success": "New order has been successfully added."}`
/// - **Error (400)**: Missing fields or a non-integer `quantity`
/// - **Error (401)**: Invalid API key
/// - **Error (404)**: The key owns no business with that name
pub async fn add_order(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
    params: Result<Query<AddOrderParams>, QueryRejection>,
) -> Result<(StatusCode, Json<SuccessResponse>), AppError> {
    let Query(params) = params?;

    order_service::create_order(&pool, &api_key, params.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new("New order has been successfully added.")),
    ))
}

/// Delete one order by `id`, confirming the `business_name` it is filed under.
pub async fn delete_order(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
    params: Result<Query<DeleteOrderParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Query(params) = params?;

    order_service::delete_order(&pool, &api_key, params.id, &params.business_name).await?;

    Ok(Json(SuccessResponse::new(
        "The order has been successfully deleted",
    )))
}
