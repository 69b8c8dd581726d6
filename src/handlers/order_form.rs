//! Public customer order form.
//!
//! Business owners share a link of the form
//! `/order?api_key=<key>&business_name=<name>` with their customers; no login
//! is needed to place an order through it.

use axum::{
    Form, Json,
    extract::{Query, State, rejection::{FormRejection, QueryRejection}},
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::DbPool,
    error::AppError,
    handlers::redirect_with,
    models::order::OrderForm,
    services::order_service,
    text::title_case,
};

const ORDER_RECEIVED: &str = "Your order has been successfully received.";

/// Which business the form orders from.
#[derive(Debug, Deserialize)]
pub struct OrderTarget {
    pub api_key: String,
    pub business_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderPageParams {
    pub business_name: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub page: &'static str,
    pub business_name: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

pub async fn order_page(Query(params): Query<OrderPageParams>) -> Json<OrderPage> {
    Json(OrderPage {
        page: "order",
        business_name: params.business_name.as_deref().map(title_case),
        message: params.message,
        error: params.error,
    })
}

/// Place an order from the customer form and come back to the form with
/// the outcome.
pub async fn place_order(
    State(pool): State<DbPool>,
    target: Result<Query<OrderTarget>, QueryRejection>,
    form: Result<Form<OrderForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Query(target) = target?;
    let Form(form) = form?;
    let back = |key: &'static str, value: &str| {
        redirect_with(
            "/order",
            &[
                ("api_key", target.api_key.as_str()),
                ("business_name", target.business_name.as_str()),
                (key, value),
            ],
        )
    };

    let new_order = form.into_new_order(target.business_name.clone());
    match order_service::create_order(&pool, &target.api_key, new_order).await {
        Ok(_) => Ok(back("message", ORDER_RECEIVED)),
        Err(e) if e.is_client_error() => {
            let message = e.to_string();
            Ok(back("error", message.as_str()))
        }
        Err(e) => Err(e),
    }
}
