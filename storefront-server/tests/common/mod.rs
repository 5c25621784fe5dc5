//! Shared helpers for HTTP integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use storefront_server::auth::password::hash_password;
use storefront_server::services::HttpsService;
use storefront_server::{Config, DbService, ServerState};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "owner";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Router over a fresh in-memory database
pub async fn app() -> Router {
    let pool = DbService::in_memory().await.expect("in-memory database").pool;
    app_with_pool(pool)
}

pub fn app_with_pool(pool: sqlx::SqlitePool) -> Router {
    let mut config = Config::with_work_dir(std::env::temp_dir().to_string_lossy());
    config.admin_username = ADMIN_USER.into();
    config.admin_password_hash = Some(hash_password(ADMIN_PASSWORD).expect("hash"));
    config.jwt_secret = Some("integration-test-secret-0123456789abcdef".into());

    let state = ServerState::with_pool(config, pool).expect("server state");
    HttpsService::new(state).router()
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    dispatch(app, request).await
}

/// POST a raw body with an optional Content-Type header
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(http::header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).expect("request");
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, token).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), token).await
}

pub async fn put(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body), token).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None, token).await
}

/// Log in as the configured admin and return the bearer token
pub async fn login(app: &Router) -> String {
    let (status, body) = post(
        app,
        "/api/auth/login",
        serde_json::json!({"username": ADMIN_USER, "password": ADMIN_PASSWORD}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Pizzas category with a "Build Your Own" pizza (8.99) carrying
/// Size (required, single) and Toppings (multiple, max 2).
pub struct PizzaFixture {
    pub category_id: i64,
    pub item_id: i64,
    pub small: i64,
    pub large: i64,
    pub pepperoni: i64,
    pub mushrooms: i64,
    pub olives: i64,
}

pub async fn pizza_fixture(app: &Router, token: &str) -> PizzaFixture {
    let (status, category) = post(
        app,
        "/api/categories",
        serde_json::json!({"name": "Pizzas", "description": "Stone baked"}),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{category}");

    let (_, item) = post(
        app,
        "/api/items",
        serde_json::json!({
            "category_id": category["id"],
            "name": "Build Your Own",
            "base_price": 8.99,
            "item_type": "PIZZA"
        }),
        Some(token),
    )
    .await;

    let (_, size) = post(
        app,
        "/api/customization-groups",
        serde_json::json!({
            "name": "Size",
            "selection_type": "SINGLE",
            "is_required": true,
            "options": [
                {"name": "Small", "price_modifier": 0.0},
                {"name": "Large", "price_modifier": 4.0}
            ]
        }),
        Some(token),
    )
    .await;
    let (_, toppings) = post(
        app,
        "/api/customization-groups",
        serde_json::json!({
            "name": "Toppings",
            "selection_type": "MULTIPLE",
            "max_selections": 2,
            "options": [
                {"name": "Pepperoni", "price_modifier": 1.0},
                {"name": "Mushrooms", "price_modifier": 0.75},
                {"name": "Olives", "price_modifier": 0.5}
            ]
        }),
        Some(token),
    )
    .await;

    let (status, _) = put(
        app,
        &format!("/api/items/{}/customizations", item["id"]),
        serde_json::json!([{"group_id": size["id"]}, {"group_id": toppings["id"]}]),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let id = |v: &Value| v["id"].as_i64().expect("id");
    PizzaFixture {
        category_id: id(&category),
        item_id: id(&item),
        small: id(&size["options"][0]),
        large: id(&size["options"][1]),
        pepperoni: id(&toppings["options"][0]),
        mushrooms: id(&toppings["options"][1]),
        olives: id(&toppings["options"][2]),
    }
}
