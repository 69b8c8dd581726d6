//! Business JSON API handlers.
//!
//! This module implements the key-authenticated business endpoints:
//! - GET|POST /all_businesses - List the caller's businesses
//! - GET|POST /add_business - Register a business
//! - GET|DELETE /delete_business - Delete a business and its orders
//!
//! Every endpoint takes the caller's key as the `api-key` query parameter.

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
    models::business::{AddBusinessParams, BusinessResponse, DeleteBusinessParams},
    services::business_service,
};

/// Body of `/all_businesses`.
#[derive(Debug, Serialize)]
pub struct BusinessList {
    pub businesses: Vec<BusinessResponse>,
}

/// List all businesses owned by the key.
///
/// # Response
///
/// - **Success (200 OK)**: `{"businesses": [...]}`, possibly empty
/// - **Error (401)**: `{"error": "Invalid API key"}`
pub async fn all_businesses(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
) -> Result<Json<BusinessList>, AppError> {
    let businesses = business_service::list_businesses(&pool, &api_key).await?;

    Ok(Json(BusinessList {
        businesses: businesses.into_iter().map(Into::into).collect(),
    }))
}

/// Register a business under the key.
///
/// # Query Parameters
///
/// `business_name`, `business_email`, `business_phone_number`, optional
/// `business_website`.
///
/// # Response
///
/// - **Success (201 Created)**: `{"Success": "Successfully added new business"}`
/// - **Error (401)**: Invalid API key
/// - **Error (409)**: The key already has a business with this name
pub async fn add_business(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
    params: Result<Query<AddBusinessParams>, QueryRejection>,
) -> Result<(StatusCode, Json<SuccessResponse>), AppError> {
    let Query(params) = params?;

    business_service::create_business(&pool, &api_key, params.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new("Successfully added new business")),
    ))
}

/// Delete a business, selected by `id` or `business_name`, with all its orders.
///
/// # Response
///
/// - **Success (200 OK)**: `{"Success": "Business has been successfully deleted"}`
/// - **Error (400)**: Neither `id` nor `business_name` given
/// - **Error (401)**: Invalid API key
/// - **Error (404)**: The key owns no such business
pub async fn delete_business(
    State(pool): State<DbPool>,
    ApiKey(api_key): ApiKey,
    params: Result<Query<DeleteBusinessParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Query(params) = params?;
    let target = params.business_ref().ok_or_else(|| {
        AppError::InvalidRequest("Either id or business_name is required".to_string())
    })?;

    business_service::delete_business(&pool, &api_key, target).await?;

    Ok(Json(SuccessResponse::new(
        "Business has been successfully deleted",
    )))
}
