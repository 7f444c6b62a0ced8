//! HTTP-level tests for the public catalog and the page gate.

mod common;

use axum::http::StatusCode;
use bakery_core::roles::Role;
use bakery_db::repositories::ProductRepo;
use common::{body_json, get, get_auth};
use sqlx::PgPool;

fn names(json: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_occasions_tag_matches_any_occasion_casing(pool: PgPool) {
    common::create_product(&pool, "Rose Cake", &["birthday"], &[("1 kg", 900)]).await;
    common::create_product(&pool, "Tier Cake", &["Wedding"], &[("3 kg", 4000)]).await;
    common::create_product(&pool, "Fudge Brownie", &["chocolate"], &[("Box", 300)]).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/products?tag=OCCASIONS").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&body_json(response).await), vec!["Rose Cake", "Tier Cake"]);

    let response = get(app, "/api/v1/occasions/occasions").await;
    assert_eq!(names(&body_json(response).await), vec!["Rose Cake", "Tier Cake"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_occasion_route(pool: PgPool) {
    common::create_product(&pool, "Rose Cake", &["Birthday"], &[("1 kg", 900)]).await;
    common::create_product(&pool, "Tier Cake", &["Wedding"], &[("3 kg", 4000)]).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/occasions/birthday").await;
    assert_eq!(names(&body_json(response).await), vec!["Rose Cake"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_and_category_filters(pool: PgPool) {
    common::create_product(&pool, "Dark Truffle", &[], &[("1 kg", 800)]).await;
    common::create_product(&pool, "Red Velvet", &[], &[("1 kg", 700)]).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/products?q=truf").await;
    assert_eq!(names(&body_json(response).await), vec!["Dark Truffle"]);

    let response = get(app.clone(), "/api/v1/products?category=cakes&q=").await;
    assert_eq!(names(&body_json(response).await).len(), 2);

    let response = get(app, "/api/v1/products?category=cookies").await;
    assert!(names(&body_json(response).await).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_detail_by_slug_includes_sizes(pool: PgPool) {
    let product =
        common::create_product(&pool, "Dark Truffle", &[], &[("500 g", 450), ("1 kg", 800)]).await;
    let app = common::build_test_app(pool);

    let response = get(app, &format!("/api/v1/products/{}", product.product.slug)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Dark Truffle");
    assert_eq!(json["data"]["sizes"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unavailable_product_is_hidden(pool: PgPool) {
    let product = common::create_product(&pool, "Old Cake", &[], &[("1 kg", 500)]).await;
    sqlx::query("UPDATE products SET is_available = FALSE WHERE id = $1")
        .bind(product.product.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/products/old-cake-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/products").await;
    assert!(names(&body_json(response).await).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_featured_is_capped_at_four(pool: PgPool) {
    for i in 0..6 {
        let product =
            common::create_product(&pool, &format!("Cake {i}"), &[], &[("1 kg", 500)]).await;
        ProductRepo::set_featured(&pool, product.product.id, true)
            .await
            .unwrap();
    }
    common::create_product(&pool, "Plain Cake", &[], &[("1 kg", 500)]).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/products/featured").await;
    let json = body_json(response).await;
    let featured = json["data"].as_array().unwrap();
    assert_eq!(featured.len(), 4);
    assert!(featured.iter().all(|p| p["is_featured"] == true));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_gate_decisions(pool: PgPool) {
    let (_, user) = common::create_user(&pool, "9000000001", Role::User).await;
    let (_, staff) = common::create_user(&pool, "9000000002", Role::Staff).await;
    let (_, admin) = common::create_user(&pool, "9000000003", Role::Admin).await;
    let app = common::build_test_app(pool);

    let anon = body_json(get(app.clone(), "/api/v1/session/access?path=/account").await).await;
    assert_eq!(anon["data"]["access"], "unauthenticated");
    assert_eq!(anon["data"]["redirect"], "/auth/login");

    let json =
        body_json(get_auth(app.clone(), "/api/v1/session/access?path=/admin", &user).await).await;
    assert_eq!(json["data"]["access"], "forbidden");
    assert_eq!(json["data"]["redirect"], "/");
    assert!(json["data"]["sections"].as_array().unwrap().is_empty());

    let json = body_json(
        get_auth(app.clone(), "/api/v1/session/access?path=/admin/products", &staff).await,
    )
    .await;
    assert_eq!(json["data"]["access"], "forbidden");
    let sections: Vec<&str> = json["data"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["section"].as_str().unwrap())
        .collect();
    assert_eq!(sections, vec!["dashboard", "orders"]);

    // Encoded page paths that carry their own query string.
    let json = body_json(
        get_auth(
            app.clone(),
            "/api/v1/session/access?path=%2Fadmin%2Fproducts%3Fpage%3D2",
            &staff,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["access"], "forbidden");
    let json = body_json(get(app.clone(), "/api/v1/session/access?path=%2Fadmin%3Ftab%3D1").await).await;
    assert_eq!(json["data"]["access"], "unauthenticated");

    let json =
        body_json(get_auth(app, "/api/v1/session/access?path=/admin/users", &admin).await).await;
    assert_eq!(json["data"]["access"], "granted");
    assert!(json["data"]["redirect"].is_null());
    assert_eq!(json["data"]["sections"].as_array().unwrap().len(), 4);
}
