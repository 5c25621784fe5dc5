//! End-to-end HTTP flows through the full middleware stack

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = app().await;

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"username": ADMIN_USER, "password": "wrong"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, _) = post(
        &app,
        "/api/auth/login",
        json!({"username": "someone", "password": ADMIN_PASSWORD}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, me) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], ADMIN_USER);
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = app().await;

    let (status, body) = get(&app, "/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = get(&app, "/api/settings", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let (status, _) = post(&app, "/api/categories", json!({"name": "Pizzas"}), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_crud() {
    let app = app().await;
    let token = login(&app).await;

    let (status, created) = post(
        &app,
        "/api/categories",
        json!({"name": "Pasta Dishes"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["slug"], "pasta-dishes");
    let id = created["id"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        "/api/categories",
        json!({"name": "Pasta Dishes"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, updated) = put(
        &app,
        &format!("/api/categories/{id}"),
        json!({"description": "Fresh daily"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Fresh daily");
    assert_eq!(updated["name"], "Pasta Dishes");

    let (status, list) = get(&app, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = delete(&app, &format!("/api/categories/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("/api/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &format!("/api/categories/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_with_items_cannot_be_deleted() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, body) = delete(
        &app,
        &format!("/api/categories/{}", pizza.category_id),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6102);
}

#[tokio::test]
async fn test_menu_and_item_builder() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, menu) = get(&app, "/api/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu[0]["name"], "Pizzas");
    assert_eq!(menu[0]["items"][0]["slug"], "build-your-own");

    let (status, detail) = get(&app, "/api/menu/items/build-your-own", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"].as_i64(), Some(pizza.item_id));
    let groups = detail["customization_groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "Size");
    assert_eq!(groups[1]["options"].as_array().unwrap().len(), 3);

    let (status, by_id) = get(&app, &format!("/api/menu/items/{}", pizza.item_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["name"], "Build Your Own");

    let (status, _) = get(&app, "/api/menu/items/no-such-pizza", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_pricing() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, cart) = post(
        &app,
        "/api/cart/price",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 1,
                "selections": [{"option_id": pizza.small}, {"option_id": pizza.pepperoni}]
            }]
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{cart}");
    assert_eq!(cart["items"][0]["unit_price"], 9.99);
    assert_eq!(cart["subtotal"], 9.99);
    assert_eq!(cart["order_type"], "PICKUP");

    let (status, body) = post(
        &app,
        "/api/cart/price",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 1,
                "selections": [
                    {"option_id": pizza.large},
                    {"option_id": pizza.pepperoni},
                    {"option_id": pizza.mushrooms},
                    {"option_id": pizza.olives}
                ]
            }]
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 6304);
    assert_eq!(body["details"]["violations"][0]["group_name"], "Toppings");
}

#[tokio::test]
async fn test_checkout_and_order_lifecycle() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, order) = post(
        &app,
        "/api/checkout",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 2,
                "selections": [{"option_id": pizza.large}]
            }],
            "customer_name": "Ada",
            "customer_phone": "555-0100"
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["order_number"], 1001);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["items"][0]["unit_price"], 12.99);
    assert_eq!(order["items"][0]["options"][0]["option_name"], "Large");
    let id = order["id"].as_i64().unwrap();

    // Pending orders cannot be deleted
    let (status, body) = delete(&app, &format!("/api/orders/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4009);

    // Skipping CONFIRMED is rejected
    let (status, body) = put(
        &app,
        &format!("/api/orders/{id}/status"),
        json!({"status": "READY"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4008);

    let (status, confirmed) = put(
        &app,
        &format!("/api/orders/{id}/status"),
        json!({"status": "CONFIRMED"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");

    let (status, list) = get(&app, "/api/orders?status=CONFIRMED", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = put(
        &app,
        &format!("/api/orders/{id}/status"),
        json!({"status": "CANCELLED"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&app, &format!("/api/orders/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("/api/orders/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Numbers keep increasing after a delete
    let (_, next) = post(
        &app,
        "/api/checkout",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 1,
                "selections": [{"option_id": pizza.small}]
            }],
            "customer_name": "Grace",
            "customer_phone": "555-0101"
        }),
        None,
    )
    .await;
    assert_eq!(next["order_number"], 1002);
}

#[tokio::test]
async fn test_store_closed_rejects_checkout() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, _) = put(
        &app,
        "/api/settings/accepting_orders",
        json!({"value": false}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/checkout",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 1,
                "selections": [{"option_id": pizza.small}]
            }],
            "customer_name": "Ada",
            "customer_phone": "555-0100"
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 4010);

    // Pricing still works while closed
    let (status, _) = post(
        &app,
        "/api/cart/price",
        json!({"items": [{
            "menu_item_id": pizza.item_id,
            "quantity": 1,
            "selections": [{"option_id": pizza.small}]
        }]}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_inactive_item_hidden_from_storefront() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (status, _) = put(
        &app,
        &format!("/api/items/{}", pizza.item_id),
        json!({"is_active": false}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/menu/items/build-your-own", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, detail) = get(&app, "/api/menu/items/build-your-own", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["is_active"], false);

    let (_, menu) = get(&app, "/api/menu", None).await;
    assert!(menu.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = post(
        &app,
        "/api/cart/price",
        json!({"items": [{"menu_item_id": "x", "quantity": 1}]}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
    assert!(body["message"].as_str().unwrap().contains("menu_item_id"));

    let (status, body) = post_raw(&app, "/api/cart/price", Some("application/json"), "{").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);

    let (status, body) = post_raw(&app, "/api/cart/price", None, r#"{"items": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (status, body) = get(&app, "/api/items/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
    assert!(body["message"].is_string());

    let (status, body) = get(&app, "/api/orders?status=LOST", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn test_group_limit_and_description_can_be_cleared() {
    let app = app().await;
    let token = login(&app).await;
    let pizza = pizza_fixture(&app, &token).await;

    let (_, groups) = get(&app, "/api/customization-groups", Some(&token)).await;
    let toppings = groups
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["name"] == "Toppings")
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/customization-groups/{toppings}");

    let (status, group) = put(&app, &uri, json!({"description": "Up to two"}), Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "{group}");
    assert_eq!(group["description"], "Up to two");
    assert_eq!(group["max_selections"], 2);

    let (status, group) = put(
        &app,
        &uri,
        json!({"max_selections": null, "description": null}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{group}");
    assert!(group["max_selections"].is_null());
    assert!(group["description"].is_null());

    let (status, cart) = post(
        &app,
        "/api/cart/price",
        json!({
            "items": [{
                "menu_item_id": pizza.item_id,
                "quantity": 1,
                "selections": [
                    {"option_id": pizza.small},
                    {"option_id": pizza.pepperoni},
                    {"option_id": pizza.mushrooms},
                    {"option_id": pizza.olives}
                ]
            }]
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{cart}");
}
