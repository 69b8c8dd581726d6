mod common;

use axum::http::{Method, StatusCode};
use common::{call, get, register, router};
use order_management_server::db::DbPool;
use serde_json::json;

async fn add_acme(app: &axum::Router, key: &str) {
    let res = call(
        app,
        Method::POST,
        "/add_business",
        &[
            ("api-key", key),
            ("business_name", "acme"),
            ("business_email", "hi@acme.io"),
            ("business_phone_number", "555-0100"),
        ],
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body, json!({ "Success": "Successfully added new business" }));
}

#[sqlx::test]
async fn business_and_order_lifecycle(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);

    add_acme(&app, &key).await;

    let res = call(
        &app,
        Method::GET,
        "/add_order",
        &[
            ("api-key", key.as_str()),
            ("business_name", "ACME"),
            ("customer_name", "Jane"),
            ("customer_address", "1 Main St"),
            ("product_name", "Widget"),
            ("quantity", "3"),
        ],
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(
        res.body,
        json!({ "Success": "New order has been successfully added." })
    );

    let res = call(
        &app,
        Method::GET,
        "/all_orders",
        &[("api-key", key.as_str()), ("business_name", "acme")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let orders = res.body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_name"], "Jane");
    assert_eq!(orders[0]["customer_address"], "1 Main St");
    assert_eq!(orders[0]["product_name"], "Widget");
    assert_eq!(orders[0]["quantity"], 3);
    assert_eq!(orders[0]["business_name"], "Acme");
    assert!(orders[0]["time"].is_string());
    assert!(orders[0].get("api_key").is_none());

    let res = call(
        &app,
        Method::DELETE,
        "/delete_business",
        &[("api-key", key.as_str()), ("business_name", "acme")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "Success": "Business has been successfully deleted" })
    );

    let res = call(
        &app,
        Method::GET,
        "/all_orders",
        &[("api-key", key.as_str()), ("business_name", "Acme")],
    )
    .await;
    assert_eq!(res.body, json!({ "orders": [] }));

    let res = call(&app, Method::POST, "/all_businesses", &[("api-key", key.as_str())]).await;
    assert_eq!(res.body, json!({ "businesses": [] }));

    Ok(())
}

#[sqlx::test]
async fn unknown_key_is_rejected_everywhere(pool: DbPool) -> anyhow::Result<()> {
    register(&pool, "ada@example.com").await;
    let app = router(pool);

    for path in ["/all_businesses", "/all_orders"] {
        let res = call(
            &app,
            Method::GET,
            path,
            &[("api-key", "not-a-real-key"), ("business_name", "Acme")],
        )
        .await;

        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(res.body, json!({ "error": "Invalid API key" }), "{path}");
    }

    let res = get(&app, "/all_businesses", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[sqlx::test]
async fn valid_key_without_orders_gets_an_empty_list(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);

    let res = call(
        &app,
        Method::GET,
        "/all_orders",
        &[("api-key", key.as_str()), ("business_name", "Nowhere")],
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "orders": [] }));

    Ok(())
}

#[sqlx::test]
async fn duplicate_business_name_conflicts(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);
    add_acme(&app, &key).await;

    let res = call(
        &app,
        Method::GET,
        "/add_business",
        &[
            ("api-key", key.as_str()),
            ("business_name", "Acme"),
            ("business_email", "other@acme.io"),
            ("business_phone_number", "555-0199"),
        ],
    )
    .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(
        res.body,
        json!({ "error": "You already have a business with this name" })
    );

    Ok(())
}

#[sqlx::test]
async fn order_errors_carry_messages(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);
    add_acme(&app, &key).await;

    let order = |business: &'static str| {
        [
            ("business_name", business),
            ("customer_name", "Jane"),
            ("customer_address", "1 Main St"),
            ("product_name", "Widget"),
            ("quantity", "3"),
        ]
    };

    let mut pairs = vec![("api-key", key.as_str())];
    pairs.extend(order("Globex"));
    let res = call(&app, Method::GET, "/add_order", &pairs).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body,
        json!({ "error": "You don't have any business with that name" })
    );

    let mut pairs = vec![("api-key", key.as_str())];
    pairs.extend(order("Acme"));
    pairs.retain(|(k, _)| *k != "quantity");
    pairs.push(("quantity", "three"));
    let res = call(&app, Method::GET, "/add_order", &pairs).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = call(
        &app,
        Method::DELETE,
        "/delete_order",
        &[("api-key", key.as_str()), ("id", "999"), ("business_name", "Acme")],
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body,
        json!({ "error": "Your business doesn't have an order with that id" })
    );

    Ok(())
}

#[sqlx::test]
async fn delete_order_checks_the_business(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);
    add_acme(&app, &key).await;

    call(
        &app,
        Method::GET,
        "/add_order",
        &[
            ("api-key", key.as_str()),
            ("business_name", "Acme"),
            ("customer_name", "Jane"),
            ("customer_address", "1 Main St"),
            ("product_name", "Widget"),
            ("quantity", "1"),
        ],
    )
    .await;
    let res = call(
        &app,
        Method::GET,
        "/all_orders",
        &[("api-key", key.as_str()), ("business_name", "Acme")],
    )
    .await;
    let id = res.body["orders"][0]["id"].as_i64().unwrap().to_string();

    let res = call(
        &app,
        Method::GET,
        "/delete_order",
        &[("api-key", key.as_str()), ("id", id.as_str()), ("business_name", "Globex")],
    )
    .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body, json!({ "error": "Incorrect business name" }));

    let res = call(
        &app,
        Method::GET,
        "/delete_order",
        &[("api-key", key.as_str()), ("id", id.as_str()), ("business_name", "acme")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "Success": "The order has been successfully deleted" })
    );

    Ok(())
}

#[sqlx::test]
async fn delete_business_needs_a_target(pool: DbPool) -> anyhow::Result<()> {
    let key = register(&pool, "ada@example.com").await;
    let app = router(pool);

    let res = call(&app, Method::DELETE, "/delete_business", &[("api-key", key.as_str())]).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = call(
        &app,
        Method::DELETE,
        "/delete_business",
        &[("api-key", key.as_str()), ("id", "42")],
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    Ok(())
}

#[sqlx::test]
async fn health_reports_the_database(pool: DbPool) -> anyhow::Result<()> {
    let app = router(pool);

    let res = get(&app, "/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"], "connected");
    assert_eq!(res.body["migrations"], json!({ "applied": 4, "pending": 0 }));

    Ok(())
}

#[sqlx::test]
async fn health_flags_a_schema_behind_the_binary(pool: DbPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM _sqlx_migrations WHERE version = (SELECT MAX(version) FROM _sqlx_migrations)")
        .execute(&pool)
        .await?;
    let app = router(pool);

    let res = get(&app, "/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "degraded");
    assert_eq!(res.body["migrations"], json!({ "applied": 3, "pending": 1 }));

    Ok(())
}
