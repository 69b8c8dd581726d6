//! Business service - ownership rules for businesses.
//!
//! This service handles:
//! - Per-owner uniqueness of (title-cased) business names
//! - Cascade deletion of a business together with its orders
//! - Listing the businesses owned by an API key
//!
//! # Atomicity Guarantees
//!
//! Every operation runs in one database transaction. The uniqueness check is
//! backed by a `UNIQUE (api_key, business_name)` index, so two concurrent
//! creates cannot both succeed.

use crate::{
    db::{DbPool, begin_write},
    error::{AppError, is_unique_violation},
    models::business::{Business, BusinessRef, DeletedBusiness, NewBusiness},
    services::account_service::require_known_key,
    text::title_case,
};

const BUSINESS_COLUMNS: &str =
    "id, business_name, business_email, business_phone_no, business_website, api_key";

/// Register a business under `api_key`.
///
/// # Errors
///
/// - `InvalidApiKey`: No user owns the key
/// - `DuplicateBusinessName`: The key already owns a business with this name
pub async fn create_business(
    pool: &DbPool,
    api_key: &str,
    new_business: NewBusiness,
) -> Result<Business, AppError> {
    let business_name = title_case(&new_business.business_name);

    let mut tx = begin_write(pool).await?;
    let owner = require_known_key(&mut tx, api_key).await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM businesses WHERE api_key = ? AND business_name = ?)",
    )
    .bind(api_key)
    .bind(&business_name)
    .fetch_one(&mut *tx)
    .await?;

    if exists {
        return Err(AppError::DuplicateBusinessName);
    }

    let business = sqlx::query_as::<_, Business>(&format!(
        "INSERT INTO businesses
             (business_name, business_email, business_phone_no, business_website, api_key)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {BUSINESS_COLUMNS}"
    ))
    .bind(&business_name)
    .bind(&new_business.business_email)
    .bind(&new_business.business_phone_no)
    .bind(&new_business.business_website)
    .bind(api_key)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateBusinessName
        } else {
            e.into()
        }
    })?;

    tx.commit().await?;

    tracing::info!(
        user_id = owner.id,
        business_id = business.id,
        name = %business.business_name,
        "business created"
    );
    Ok(business)
}

/// Delete a business and every order filed under it.
///
/// Orders are matched on the same API key and business name, so businesses
/// with the same name under other keys keep their orders.
///
/// # Errors
///
/// - `InvalidApiKey`: No user owns the key
/// - `NotFound`: The key owns no business with this id/name
pub async fn delete_business(
    pool: &DbPool,
    api_key: &str,
    target: BusinessRef,
) -> Result<DeletedBusiness, AppError> {
    let mut tx = begin_write(pool).await?;
    let owner = require_known_key(&mut tx, api_key).await?;

    let business = match target {
        BusinessRef::Id(id) => {
            sqlx::query_as::<_, Business>(&format!(
                "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ? AND api_key = ?"
            ))
            .bind(id)
            .bind(api_key)
            .fetch_optional(&mut *tx)
            .await?
        }
        BusinessRef::Name(name) => {
            sqlx::query_as::<_, Business>(&format!(
                "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE business_name = ? AND api_key = ?"
            ))
            .bind(title_case(&name))
            .bind(api_key)
            .fetch_optional(&mut *tx)
            .await?
        }
    }
    .ok_or(AppError::NotFound)?;

    let orders_removed = sqlx::query("DELETE FROM orders WHERE api_key = ? AND business_name = ?")
        .bind(api_key)
        .bind(&business.business_name)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM businesses WHERE id = ?")
        .bind(business.id)
        .execute(&mut *tx)
        .await?;

    // Both deletes land together or not at all
    tx.commit().await?;

    tracing::info!(
        user_id = owner.id,
        business_id = business.id,
        orders_removed,
        "business deleted"
    );
    Ok(DeletedBusiness {
        business,
        orders_removed,
    })
}

/// List the businesses owned by `api_key`, oldest first.
///
/// A known key without businesses yields an empty list; an unknown key is an
/// `InvalidApiKey` error.
pub async fn list_businesses(pool: &DbPool, api_key: &str) -> Result<Vec<Business>, AppError> {
    let mut conn = pool.acquire().await?;
    require_known_key(&mut conn, api_key).await?;

    let businesses = sqlx::query_as::<_, Business>(&format!(
        "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE api_key = ? ORDER BY id"
    ))
    .bind(api_key)
    .fetch_all(&mut *conn)
    .await?;

    Ok(businesses)
}
