//! HTTP-level tests for the back office: role gates, orders, products, users.

mod common;

use axum::http::StatusCode;
use axum::Router;
use bakery_core::roles::Role;
use common::{body_json, get, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

/// Put one 2 x 500 line in the shopper's cart and finalize it into an order.
async fn place_order(pool: &PgPool, app: &Router, token: &str) -> i64 {
    let cake = common::create_product(pool, "Order Cake", &[], &[("1 kg", 500)]).await;
    let body = json!({ "product_id": cake.product.id, "size_id": cake.sizes[0].id, "quantity": 2 });
    post_json_auth(app.clone(), "/api/v1/cart/items", token, body).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/checkout/finalize",
        token,
        json!({ "outcome": "success", "session_id": "cs_test_admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["order"]["id"].as_i64().unwrap()
}

fn product_form(name: &str, sizes: serde_json::Value) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Layered chocolate sponge",
        "category": "cakes",
        "images": ["https://cdn.test/forest.jpg", "  "],
        "tags": "Birthday, chocolate,",
        "sizes": sizes,
    })
}

// ---------------------------------------------------------------------------
// Role gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shopper_is_forbidden_everywhere(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "9000000050", Role::User).await;
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/admin/dashboard",
        "/api/v1/admin/orders",
        "/api/v1/admin/products",
        "/api/v1/admin/users",
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_staff_sees_dashboard_and_orders_only(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "9000000051", Role::Staff).await;
    let app = common::build_test_app(pool);

    for uri in ["/api/v1/admin/dashboard", "/api/v1/admin/orders"] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
    for uri in ["/api/v1/admin/products", "/api/v1/admin/users"] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_sees_every_section(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "9000000052", Role::Admin).await;
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/admin/dashboard",
        "/api/v1/admin/orders",
        "/api/v1/admin/products",
        "/api/v1/admin/users",
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_change_applies_to_existing_token(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000053", Role::Admin).await;
    let (user_id, token) = common::create_user(&pool, "9000000054", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/admin/orders", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{user_id}/role"),
        &admin,
        json!({ "role": "staff" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "staff");

    let response = get_auth(app, "/api/v1/admin/orders", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_is_rejected(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000055", Role::Admin).await;
    let (user_id, _) = common::create_user(&pool, "9000000056", Role::User).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{user_id}/role"),
        &admin,
        json!({ "role": "owner" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_status_moves_one_step_at_a_time(pool: PgPool) {
    let (_, shopper) = common::create_user(&pool, "9000000057", Role::User).await;
    let (_, staff) = common::create_user(&pool, "9000000058", Role::Staff).await;
    let app = common::build_test_app(pool.clone());
    let order_id = place_order(&pool, &app, &shopper).await;
    let uri = format!("/api/v1/admin/orders/{order_id}/status");

    let response = put_json_auth(app.clone(), &uri, &staff, json!({ "status": "shipped" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response =
        put_json_auth(app.clone(), &uri, &staff, json!({ "status": "processing" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "processing");

    let response =
        put_json_auth(app.clone(), &uri, &staff, json!({ "status": "cancelled" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(app.clone(), &uri, &staff, json!({ "status": "pending" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get_auth(app, &format!("/api/v1/admin/orders/{order_id}"), &staff).await).await;
    assert_eq!(json["data"]["status"], "cancelled");
    assert_eq!(json["data"]["customer_name"], "Test user");
    assert_eq!(json["data"]["customer_phone"], "9000000057");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_order_is_not_found(pool: PgPool) {
    let (_, staff) = common::create_user(&pool, "9000000059", Role::Staff).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/orders/424242", &staff).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_figures(pool: PgPool) {
    let (_, shopper) = common::create_user(&pool, "9000000060", Role::User).await;
    let (_, admin) = common::create_user(&pool, "9000000061", Role::Admin).await;
    let app = common::build_test_app(pool.clone());
    place_order(&pool, &app, &shopper).await;
    common::create_product(&pool, "Spare Cake", &[], &[("1 kg", 400)]).await;

    let json = body_json(get_auth(app, "/api/v1/admin/dashboard", &admin).await).await;
    let stats = &json["data"];
    assert_eq!(stats["total_products"], 2);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["total_users"], 2);
    assert_eq!(stats["total_revenue"].as_f64(), Some(1000.0));
    assert_eq!(stats["average_order_value"].as_f64(), Some(1000.0));
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_product_generates_slug_and_parses_tags(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000062", Role::Admin).await;
    let app = common::build_test_app(pool);

    let form = product_form(
        "Black Forest",
        json!([{ "size_label": "1 kg", "price": 650 }, { "size_label": "500 g", "price": 350 }]),
    );
    let response = post_json_auth(app.clone(), "/api/v1/admin/products", &admin, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let product = &json["data"];

    let slug = product["slug"].as_str().unwrap();
    let suffix: u32 = slug.strip_prefix("black-forest-").unwrap().parse().unwrap();
    assert!(suffix < 1000);
    assert_eq!(product["tags"], json!(["Birthday", "chocolate"]));
    assert_eq!(product["images"], json!(["https://cdn.test/forest.jpg"]));
    assert_eq!(product["is_available"], true);
    assert_eq!(product["is_featured"], false);
    assert_eq!(product["sizes"].as_array().unwrap().len(), 2);

    // Visible on the storefront under its slug.
    let response = get(app, &format!("/api/v1/products/{slug}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_form_validation(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000063", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/products",
        &admin,
        product_form("No Sizes", json!([])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/admin/products",
        &admin,
        product_form("Free Cake", json!([{ "size_label": "1 kg", "price": -5 }])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_sizes_and_keeps_slug(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000064", Role::Admin).await;
    let product =
        common::create_product(&pool, "Truffle", &["Birthday"], &[("500 g", 450), ("1 kg", 800)])
            .await;
    let app = common::build_test_app(pool);

    let mut form = product_form("Truffle Royale", json!([{ "size_label": "2 kg", "price": 1500 }]));
    form["is_available"] = json!(false);
    form["tags"] = json!(["Anniversary"]);
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/products/{}", product.product.id),
        &admin,
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let updated = &json["data"];
    assert_eq!(updated["name"], "Truffle Royale");
    assert_eq!(updated["slug"], "truffle-1");
    assert_eq!(updated["tags"], json!(["Anniversary"]));
    assert_eq!(updated["is_available"], false);
    let sizes = updated["sizes"].as_array().unwrap();
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0]["size_label"], "2 kg");

    // Hidden from the storefront, still listed in the back office.
    let response = get(app.clone(), "/api/v1/products/truffle-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(get_auth(app, "/api/v1/admin/products", &admin).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_featured_toggle(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000065", Role::Admin).await;
    let product = common::create_product(&pool, "Truffle", &[], &[("1 kg", 500)]).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/admin/products/{}/featured", product.product.id);

    let response = put_json_auth(app.clone(), &uri, &admin, json!({ "is_featured": true })).await;
    assert_eq!(body_json(response).await["data"]["is_featured"], true);
    let json = body_json(get(app.clone(), "/api/v1/products/featured").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    put_json_auth(app.clone(), &uri, &admin, json!({ "is_featured": false })).await;
    let json = body_json(get(app, "/api/v1/products/featured").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_table_includes_login_email(pool: PgPool) {
    let (_, admin) = common::create_user(&pool, "9000000066", Role::Admin).await;
    common::create_user(&pool, "9000000067", Role::User).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/v1/admin/users", &admin).await).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users
        .iter()
        .any(|u| u["email"] == "9000000067@bakingtales.com" && u["role"] == "user"));
}
