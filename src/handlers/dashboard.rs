//! Logged-in browser pages.
//!
//! Every route here sits behind [`require_session`](crate::middleware::auth::require_session);
//! the owner's API key comes from the session, never from the URL.

use axum::{
    Extension, Form, Json,
    extract::{Query, State, rejection::{FormRejection, QueryRejection}},
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::DbPool,
    error::AppError,
    handlers::{FlashParams, FormPage, redirect_with},
    middleware::auth::CurrentUser,
    models::{
        business::{BusinessRef, BusinessResponse, BusinessSetupForm},
        order::{DeleteOrderParams, OrderResponse},
        user::UserProfile,
    },
    services::{business_service, order_service},
    text::title_case,
};

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    #[serde(flatten)]
    pub user: UserProfile,
    pub businesses: Vec<BusinessResponse>,
    pub error: Option<String>,
}

pub async fn dashboard(
    State(pool): State<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(flash): Query<FlashParams>,
) -> Result<Json<DashboardPage>, AppError> {
    let businesses = business_service::list_businesses(&pool, &user.api_key).await?;

    Ok(Json(DashboardPage {
        user: user.into(),
        businesses: businesses.into_iter().map(Into::into).collect(),
        error: flash.error,
    }))
}

pub async fn business_setup_page(Query(flash): Query<FlashParams>) -> Json<FormPage> {
    Json(FormPage::new("business_setup", flash))
}

/// Register a business from the setup form and open its order listing.
pub async fn business_setup(
    State(pool): State<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    form: Result<Form<BusinessSetupForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;

    match business_service::create_business(&pool, &user.api_key, form.into()).await {
        Ok(business) => Ok(redirect_with(
            "/listings",
            &[("business_name", business.business_name.as_str())],
        )),
        Err(e) if e.is_client_error() => {
            let message = e.to_string();
            Ok(redirect_with("/business_setup", &[("error", message.as_str())]))
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListingsParams {
    pub business_name: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingsPage {
    pub name: String,
    pub business_name: String,
    pub orders: Vec<OrderResponse>,
    pub error: Option<String>,
}

/// Orders of one of the user's businesses.
pub async fn listings(
    State(pool): State<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<ListingsParams>, QueryRejection>,
) -> Result<Json<ListingsPage>, AppError> {
    let Query(params) = params?;

    let orders = order_service::list_orders(&pool, &user.api_key, &params.business_name).await?;

    Ok(Json(ListingsPage {
        name: user.name,
        business_name: title_case(&params.business_name),
        orders: orders.into_iter().map(Into::into).collect(),
        error: params.error,
    }))
}

/// Delete one order and return to its listing.
pub async fn del_order(
    State(pool): State<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<DeleteOrderParams>, QueryRejection>,
) -> Result<Redirect, AppError> {
    let Query(params) = params?;
    let listing = title_case(&params.business_name);

    match order_service::delete_order(&pool, &user.api_key, params.id, &params.business_name).await
    {
        Ok(_) => Ok(redirect_with("/listings", &[("business_name", listing.as_str())])),
        Err(e) if e.is_client_error() => {
            let message = e.to_string();
            Ok(redirect_with(
                "/listings",
                &[("business_name", listing.as_str()), ("error", message.as_str())],
            ))
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DelBusinessParams {
    pub id: i64,
}

/// Delete a business with all of its orders and return to the dashboard.
pub async fn del_business(
    State(pool): State<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<DelBusinessParams>, QueryRejection>,
) -> Result<Redirect, AppError> {
    let Query(params) = params?;

    match business_service::delete_business(&pool, &user.api_key, BusinessRef::Id(params.id)).await
    {
        Ok(_) => Ok(Redirect::to("/dashboard")),
        Err(e) if e.is_client_error() => {
            let message = e.to_string();
            Ok(redirect_with("/dashboard", &[("error", message.as_str())]))
        }
        Err(e) => Err(e),
    }
}
