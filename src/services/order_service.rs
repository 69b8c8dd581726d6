//! Order service - creating, listing and deleting orders.
//!
//! Orders are filed under a business by `(api_key, business_name)`. Every
//! business-name input is title-cased before it is compared, so the JSON API
//! and the browser routes agree on which orders a name selects.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::{
    db::{DbPool, begin_write},
    error::AppError,
    models::order::{NewOrder, Order},
    services::account_service::require_known_key,
    text::title_case,
};

const ORDER_COLUMNS: &str = "id, api_key, customer_name, customer_address, product_name, \
                             quantity, created_at, business_name";

/// Latest order timestamp handed out by this process, in microseconds.
static LAST_ORDER_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Wall-clock time, truncated to microseconds, that never runs backwards
/// across orders in this process.
fn order_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = now.timestamp_micros();
    let latest = LAST_ORDER_MICROS
        .fetch_max(micros, Ordering::SeqCst)
        .max(micros);

    DateTime::from_timestamp_micros(latest).unwrap_or(now)
}

/// Record a new order.
///
/// # Errors
///
/// - `InvalidApiKey`: No user owns the key
/// - `UnknownBusiness`: The key owns no business with this name; nothing is stored
pub async fn create_order(
    pool: &DbPool,
    api_key: &str,
    new_order: NewOrder,
) -> Result<Order, AppError> {
    let business_name = title_case(&new_order.business_name);

    let mut tx = begin_write(pool).await?;
    let owner = require_known_key(&mut tx, api_key).await?;

    let business_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM businesses WHERE api_key = ? AND business_name = ?)",
    )
    .bind(api_key)
    .bind(&business_name)
    .fetch_one(&mut *tx)
    .await?;

    if !business_exists {
        return Err(AppError::UnknownBusiness);
    }

    let order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders
             (api_key, customer_name, customer_address, product_name, quantity, created_at, business_name)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(api_key)
    .bind(&new_order.customer_name)
    .bind(&new_order.customer_address)
    .bind(&new_order.product_name)
    .bind(new_order.quantity)
    .bind(order_timestamp())
    .bind(&business_name)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = owner.id,
        order_id = order.id,
        business = %order.business_name,
        "order created"
    );
    Ok(order)
}

/// List the orders filed under one business of `api_key`, oldest first.
///
/// # Errors
///
/// - `InvalidApiKey`: No user owns the key (a known key with no matching
///   orders yields an empty list instead)
pub async fn list_orders(
    pool: &DbPool,
    api_key: &str,
    business_name: &str,
) -> Result<Vec<Order>, AppError> {
    let mut conn = pool.acquire().await?;
    require_known_key(&mut conn, api_key).await?;

    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders
         WHERE api_key = ? AND business_name = ?
         ORDER BY id"
    ))
    .bind(api_key)
    .bind(title_case(business_name))
    .fetch_all(&mut *conn)
    .await?;

    Ok(orders)
}

/// Delete one order.
///
/// # Errors
///
/// - `InvalidApiKey`: No user owns the key
/// - `OrderNotFound`: The key has no order with this id
/// - `BusinessMismatch`: The order is filed under a different business
pub async fn delete_order(
    pool: &DbPool,
    api_key: &str,
    order_id: i64,
    business_name: &str,
) -> Result<Order, AppError> {
    let business_name = title_case(business_name);

    let mut tx = begin_write(pool).await?;
    let owner = require_known_key(&mut tx, api_key).await?;

    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND api_key = ?"
    ))
    .bind(order_id)
    .bind(api_key)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    if order.business_name != business_name {
        return Err(AppError::BusinessMismatch);
    }

    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = owner.id,
        order_id = order.id,
        business = %order.business_name,
        "order deleted"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{business::NewBusiness, user::NewUser},
        services::{account_service, business_service},
    };

    async fn owner_with_business(pool: &DbPool, email: &str, name: &str) -> anyhow::Result<String> {
        let user = account_service::register(
            pool,
            NewUser {
                name: "owner".into(),
                email: email.into(),
                password: "pw".into(),
                plan: "basic".into(),
            },
        )
        .await?;
        business_service::create_business(
            pool,
            &user.api_key,
            NewBusiness {
                business_name: name.into(),
                business_email: "shop@example.com".into(),
                business_phone_no: "555-0100".into(),
                business_website: Some("https://shop.example.com".into()),
            },
        )
        .await?;
        Ok(user.api_key)
    }

    fn order(business_name: &str, quantity: i64) -> NewOrder {
        NewOrder {
            business_name: business_name.into(),
            customer_name: "Jane".into(),
            customer_address: "1 Main St".into(),
            product_name: "Widget".into(),
            quantity,
        }
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut previous = order_timestamp();
        for _ in 0..1000 {
            let next = order_timestamp();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[sqlx::test]
    async fn create_files_the_order_under_the_business(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;

        let created = create_order(&pool, &key, order("acme", 3)).await?;

        assert_eq!(created.business_name, "Acme");
        assert_eq!(created.quantity, 3);
        assert_eq!(created.api_key, key);

        let listed = list_orders(&pool, &key, "Acme").await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].created_at, created.created_at);
        Ok(())
    }

    #[sqlx::test]
    async fn unknown_business_stores_nothing(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;

        let err = create_order(&pool, &key, order("Globex", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownBusiness));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }

    #[sqlx::test]
    async fn another_owners_business_is_unknown(pool: DbPool) -> anyhow::Result<()> {
        owner_with_business(&pool, "a@example.com", "Acme").await?;
        let other = owner_with_business(&pool, "b@example.com", "Globex").await?;

        let err = create_order(&pool, &other, order("Acme", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownBusiness));
        Ok(())
    }

    #[sqlx::test]
    async fn create_rejects_unknown_key(pool: DbPool) -> anyhow::Result<()> {
        let err = create_order(&pool, "nope", order("Acme", 1)).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidApiKey));
        Ok(())
    }

    #[sqlx::test]
    async fn quantity_is_accepted_as_given(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;

        let zero = create_order(&pool, &key, order("Acme", 0)).await?;
        let negative = create_order(&pool, &key, order("Acme", -2)).await?;

        assert_eq!(zero.quantity, 0);
        assert_eq!(negative.quantity, -2);
        assert!(negative.created_at >= zero.created_at);
        Ok(())
    }

    #[sqlx::test]
    async fn list_is_exact_per_key_and_name(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;
        let other = owner_with_business(&pool, "b@example.com", "Acme").await?;
        create_order(&pool, &key, order("Acme", 1)).await?;
        create_order(&pool, &key, order("Acme", 2)).await?;
        create_order(&pool, &other, order("Acme", 5)).await?;

        let mine = list_orders(&pool, &key, "ACME").await?;
        assert_eq!(mine.iter().map(|o| o.quantity).collect::<Vec<_>>(), vec![1, 2]);

        assert!(list_orders(&pool, &key, "Globex").await?.is_empty());
        let err = list_orders(&pool, "nope", "Acme").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidApiKey));
        Ok(())
    }

    #[sqlx::test]
    async fn delete_checks_owner_and_business(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;
        let other = owner_with_business(&pool, "b@example.com", "Globex").await?;
        let placed = create_order(&pool, &key, order("Acme", 1)).await?;

        let unknown_key = delete_order(&pool, "nope", placed.id, "Acme").await.unwrap_err();
        assert!(matches!(unknown_key, AppError::InvalidApiKey));

        let foreign = delete_order(&pool, &other, placed.id, "Acme").await.unwrap_err();
        assert!(matches!(foreign, AppError::OrderNotFound));

        let mismatch = delete_order(&pool, &key, placed.id, "Globex").await.unwrap_err();
        assert!(matches!(mismatch, AppError::BusinessMismatch));

        let missing = delete_order(&pool, &key, placed.id + 100, "Acme").await.unwrap_err();
        assert!(matches!(missing, AppError::OrderNotFound));

        let deleted = delete_order(&pool, &key, placed.id, "acme").await?;
        assert_eq!(deleted.id, placed.id);
        assert!(list_orders(&pool, &key, "Acme").await?.is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn delete_removes_exactly_one_row(pool: DbPool) -> anyhow::Result<()> {
        let key = owner_with_business(&pool, "a@example.com", "Acme").await?;
        let first = create_order(&pool, &key, order("Acme", 1)).await?;
        let second = create_order(&pool, &key, order("Acme", 2)).await?;

        delete_order(&pool, &key, first.id, "Acme").await?;

        let remaining = list_orders(&pool, &key, "Acme").await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
        Ok(())
    }

    #[sqlx::test]
    async fn concurrent_orders_all_land(pool: DbPool) -> anyhow::Result<()> {
        let mut keys = Vec::new();
        for i in 0..4 {
            keys.push(owner_with_business(&pool, &format!("owner{i}@example.com"), "Acme").await?);
        }

        let mut tasks = Vec::new();
        for key in &keys {
            for quantity in 1..=10 {
                let pool = pool.clone();
                let key = key.clone();
                tasks.push(tokio::spawn(async move {
                    create_order(&pool, &key, order("Acme", quantity)).await
                }));
            }
        }
        for task in tasks {
            task.await??;
        }

        for key in &keys {
            let orders = list_orders(&pool, key, "Acme").await?;
            assert_eq!(orders.len(), 10);
            assert!(orders.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }
        Ok(())
    }
}
