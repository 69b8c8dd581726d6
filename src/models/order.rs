//! Order data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an order record from the database.
///
/// # Database Table
///
/// Maps to the `orders` table. Each order:
/// - Belongs to one user through `api_key`
/// - Is filed under a business by its title-cased `business_name`
///
/// Deleting the business deletes the order with it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub api_key: String,
    pub customer_name: String,
    pub customer_address: String,
    pub product_name: String,

    /// Accepted as given; zero or negative quantities are not rejected
    pub quantity: i64,

    /// When the order was received (never earlier than the previous order)
    pub created_at: DateTime<Utc>,

    pub business_name: String,
}

/// Input for creating an order, independent of which surface sent it.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub business_name: String,
    pub customer_name: String,
    pub customer_address: String,
    pub product_name: String,
    pub quantity: i64,
}

/// Query parameters of `/add_order`.
#[derive(Debug, Deserialize)]
pub struct AddOrderParams {
    pub business_name: String,
    pub customer_name: String,
    pub customer_address: String,
    pub product_name: String,
    pub quantity: i64,
}

impl From<AddOrderParams> for NewOrder {
    fn from(params: AddOrderParams) -> Self {
        Self {
            business_name: params.business_name,
            customer_name: params.customer_name,
            customer_address: params.customer_address,
            product_name: params.product_name,
            quantity: params.quantity,
        }
    }
}

/// Customer order form posted to `/order`.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub cus_name: String,
    pub address: String,
    pub product_name: String,
    pub qty: i64,
}

impl OrderForm {
    pub fn into_new_order(self, business_name: String) -> NewOrder {
        NewOrder {
            business_name,
            customer_name: self.cus_name,
            customer_address: self.address,
            product_name: self.product_name,
            quantity: self.qty,
        }
    }
}

/// Query parameters selecting one business's orders.
#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub business_name: String,
}

/// Query parameters of `/delete_order` and `/del_order`.
#[derive(Debug, Deserialize)]
pub struct DeleteOrderParams {
    pub id: i64,
    pub business_name: String,
}

/// Response body for order listings.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 7,
///   "customer_name": "Jane",
///   "customer_address": "1 Main St",
///   "product_name": "Widget",
///   "quantity": 3,
///   "time": "2025-12-21T16:00:00Z",
///   "business_name": "Acme"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_name: String,
    pub customer_address: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    pub business_name: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            customer_address: order.customer_address,
            product_name: order.product_name,
            quantity: order.quantity,
            created_at: order.created_at,
            business_name: order.business_name,
        }
    }
}
