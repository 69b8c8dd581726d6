//! Business data models and API request/response types.
//!
//! This module defines:
//! - `Business`: Database entity representing a business owned by an API key
//! - Request types for the JSON API and the browser setup form
//! - `BusinessResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};

/// Represents a business record from the database.
///
/// # Database Table
///
/// Maps to the `businesses` table. Each business:
/// - Belongs to one user through `api_key`
/// - Has a title-cased `business_name` unique among that user's businesses
///
/// Orders point back at a business by `(api_key, business_name)` rather than
/// by id; the schema enforces that pairing with a foreign key.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Business {
    pub id: i64,
    pub business_name: String,
    pub business_email: String,
    pub business_phone_no: String,
    pub business_website: Option<String>,

    /// API key of the owning user
    pub api_key: String,
}

/// Input for creating a business, independent of which surface sent it.
///
/// `business_name` is normalized by the service, not by callers.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub business_name: String,
    pub business_email: String,
    pub business_phone_no: String,
    pub business_website: Option<String>,
}

/// Query parameters of `/add_business`.
///
/// # Example
///
/// ```text
/// /add_business?api-key=...&business_name=acme&business_email=hi@acme.io&business_phone_number=555-0100
/// ```
#[derive(Debug, Deserialize)]
pub struct AddBusinessParams {
    pub business_name: String,
    pub business_email: String,
    pub business_phone_number: String,
    #[serde(default)]
    pub business_website: Option<String>,
}

impl From<AddBusinessParams> for NewBusiness {
    fn from(params: AddBusinessParams) -> Self {
        Self {
            business_name: params.business_name,
            business_email: params.business_email,
            business_phone_no: params.business_phone_number,
            business_website: params.business_website.filter(|w| !w.is_empty()),
        }
    }
}

/// Business registration form posted from the dashboard.
#[derive(Debug, Deserialize)]
pub struct BusinessSetupForm {
    pub biz_name: String,
    pub biz_email: String,
    pub biz_phone_no: String,
    #[serde(default)]
    pub biz_website: Option<String>,
}

impl From<BusinessSetupForm> for NewBusiness {
    fn from(form: BusinessSetupForm) -> Self {
        Self {
            business_name: form.biz_name,
            business_email: form.biz_email,
            business_phone_no: form.biz_phone_no,
            business_website: form.biz_website.filter(|w| !w.is_empty()),
        }
    }
}

/// How a caller names the business to delete.
#[derive(Debug, Clone)]
pub enum BusinessRef {
    Id(i64),
    Name(String),
}

/// Query parameters of `/delete_business`; either `id` or `business_name`.
#[derive(Debug, Deserialize)]
pub struct DeleteBusinessParams {
    pub id: Option<i64>,
    pub business_name: Option<String>,
}

impl DeleteBusinessParams {
    /// Prefer the id when both are given.
    pub fn business_ref(self) -> Option<BusinessRef> {
        match (self.id, self.business_name) {
            (Some(id), _) => Some(BusinessRef::Id(id)),
            (None, Some(name)) => Some(BusinessRef::Name(name)),
            (None, None) => None,
        }
    }
}

/// Outcome of a cascade delete.
#[derive(Debug, Clone)]
pub struct DeletedBusiness {
    pub business: Business,

    /// Number of orders removed together with the business
    pub orders_removed: u64,
}

/// Response body for business listings.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "business_name": "Acme",
///   "business_email": "hi@acme.io",
///   "business_phone_no": "555-0100",
///   "business_website": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BusinessResponse {
    pub id: i64,
    pub business_name: String,
    pub business_email: String,
    pub business_phone_no: String,
    pub business_website: Option<String>,
}

/// Convert database Business to API BusinessResponse.
///
/// The owner's API key is dropped; the caller already holds it.
impl From<Business> for BusinessResponse {
    fn from(business: Business) -> Self {
        Self {
            id: business.id,
            business_name: business.business_name,
            business_email: business.business_email,
            business_phone_no: business.business_phone_no,
            business_website: business.business_website,
        }
    }
}
