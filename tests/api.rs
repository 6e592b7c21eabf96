//! HTTP surface tests: routing, auth gating, response envelopes
//! Run: cargo test --test api

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use reef_store::auth::{JwtConfig, JwtService};
use reef_store::core::{Config, ServerState, build_app};
use reef_store::db::DbService;
use reef_store::db::models::{Category, CategoryCreate};
use reef_store::db::repository::CategoryRepository;

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "api-test-secret-key-with-enough-length".to_string(),
        expiration_minutes: 60,
        issuer: "reef-store".to_string(),
        audience: "reef-clients".to_string(),
    }
}

async fn test_state() -> ServerState {
    let db = DbService::new_in_memory().await.expect("in-memory db").db;
    let mut config = Config::from_env();
    config.jwt = test_jwt_config();
    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    ServerState::new(config, db, jwt_service)
}

async fn seed_category(state: &ServerState) -> Category {
    CategoryRepository::new(state.get_db())
        .create(CategoryCreate {
            name: "Audio".to_string(),
            slug: "audio".to_string(),
            description: None,
            image_url: None,
            parent_category: None,
            active: None,
            order: None,
        })
        .await
        .expect("seed category")
}

fn token(state: &ServerState, role: &str) -> String {
    state
        .jwt_service
        .generate_token("user-1", "tester", role)
        .expect("token")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("encode")))
        .expect("request")
}

fn sample_product(category_id: &str, sku: &str) -> Value {
    json!({
        "name": "Wireless Headphones",
        "description": "Closed-back, 30 hour battery",
        "price": 149.99,
        "imageUrl": "/images/hp.jpg",
        "category": category_id,
        "brand": "Acme",
        "sku": sku,
        "inventory": 5
    })
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.expect("response")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = build_app(test_state().await);
    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_envelope_has_pagination_fields() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let app = build_app(state.clone());
    let admin = token(&state, "admin");

    for i in 0..3 {
        let response = send(
            &app,
            post_json(
                "/api/products",
                Some(&admin),
                sample_product(&category_id, &format!("SKU-{i}")),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, get("/api/products?limit=2&page=1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["products"].as_array().expect("products").len(), 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["totalProducts"], 3);

    // The category is denormalized to {id, name, slug}
    let joined = &body["products"][0]["category"];
    assert_eq!(joined["name"], "Audio");
    assert_eq!(joined["slug"], "audio");
}

#[tokio::test]
async fn missing_product_maps_to_404_with_message() {
    let app = build_app(test_state().await);
    let response = send(&app, get("/api/products/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn writes_require_a_token() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let app = build_app(state);

    let response = send(
        &app,
        post_json("/api/products", None, sample_product(&category_id, "SKU-1")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn writes_require_the_admin_role() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let shopper = token(&state, "user");
    let app = build_app(state);

    let response = send(
        &app,
        post_json(
            "/api/products",
            Some(&shopper),
            sample_product(&category_id, "SKU-1"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_create_and_fetch_a_product() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let admin = token(&state, "admin");
    let app = build_app(state);

    let response = send(
        &app,
        post_json(
            "/api/products",
            Some(&admin),
            sample_product(&category_id, "SKU-9"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["sku"], "SKU-9");
    let id = created["id"].as_str().expect("created id").to_string();

    let response = send(&app, get(&format!("/api/products/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json(response).await;
    assert_eq!(fetched["name"], "Wireless Headphones");
    assert_eq!(fetched["category"]["slug"], "audio");
}

#[tokio::test]
async fn duplicate_sku_create_is_a_400() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let admin = token(&state, "admin");
    let app = build_app(state);

    let first = send(
        &app,
        post_json(
            "/api/products",
            Some(&admin),
            sample_product(&category_id, "DUP-1"),
        ),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(
        &app,
        post_json(
            "/api/products",
            Some(&admin),
            sample_product(&category_id, "DUP-1"),
        ),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = read_json(second).await;
    assert_eq!(body["message"], "Product with this SKU already exists");
}

#[tokio::test]
async fn negative_price_create_is_a_400() {
    let state = test_state().await;
    let category = seed_category(&state).await;
    let category_id = category.id.as_ref().unwrap().to_string();
    let admin = token(&state, "admin");
    let app = build_app(state);

    let mut body = sample_product(&category_id, "NEG-1");
    body["price"] = json!(-1.0);
    let response = send(&app, post_json("/api/products", Some(&admin), body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_category_create_is_a_400() {
    let state = test_state().await;
    let admin = token(&state, "admin");
    let app = build_app(state);

    let response = send(
        &app,
        post_json(
            "/api/products",
            Some(&admin),
            sample_product("category:missing", "NC-1"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Category does not exist");
}

#[tokio::test]
async fn category_listing_is_public() {
    let state = test_state().await;
    seed_category(&state).await;
    let app = build_app(state);

    let response = send(&app, get("/api/categories")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().expect("categories").len(), 1);
    assert_eq!(body[0]["slug"], "audio");
}
