//! Catalog CRUD and per-diner order routes.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};
use swiftbite_integration_tests::TestApp;

fn margherita() -> Value {
    json!({
        "name": "Margherita",
        "image": "https://img.swiftbite.io/margherita.jpg",
        "price": 12.5,
        "category": "pizza",
        "short_description": "Tomato, mozzarella, basil",
    })
}

#[tokio::test]
async fn test_menu_crud() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;

    let resp = app.get("/menu", None).await;
    assert_eq!(resp.body, json!([]));

    let resp = app.post("/menu", Some(&admin), margherita()).await;
    assert_eq!(resp.status, StatusCode::OK);
    let id = resp.body["insertedId"].as_str().unwrap().to_string();

    let resp = app.get(&format!("/menu/category/{id}"), None).await;
    assert_eq!(resp.body["_id"], id.as_str());
    assert_eq!(resp.body["name"], "Margherita");
    assert_eq!(resp.body["price"], 12.5);

    let mut changed = margherita();
    changed["price"] = json!(13.0);
    let uri = format!("/menu/category/{id}");

    let resp = app.patch(&uri, Some(&admin), changed.clone()).await;
    assert_eq!(resp.body, json!({ "matchedCount": 1, "modifiedCount": 1 }));

    let resp = app.patch(&uri, Some(&admin), changed).await;
    assert_eq!(resp.body, json!({ "matchedCount": 1, "modifiedCount": 0 }));

    let resp = app.get("/menu", None).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["price"], 13.0);

    let resp = app.delete(&format!("/menu/{id}"), Some(&admin)).await;
    assert_eq!(resp.body, json!({ "deletedCount": 1 }));

    let resp = app.delete(&format!("/menu/{id}"), Some(&admin)).await;
    assert_eq!(resp.body, json!({ "deletedCount": 0 }));
}

#[tokio::test]
async fn test_absent_menu_item_is_a_value() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;
    let missing = "00000000-0000-4000-8000-000000000000";

    let resp = app.get(&format!("/menu/category/{missing}"), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Value::Null);

    let resp = app
        .patch(&format!("/menu/category/{missing}"), Some(&admin), margherita())
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "matchedCount": 0, "modifiedCount": 0 }));

    let resp = app.get("/menu/category/not-a-uuid", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_menu_writes_require_admin() {
    let app = TestApp::new();
    app.register("diner@swiftbite.io").await;
    let diner = app.token_for("diner@swiftbite.io");

    let resp = app.post("/menu", Some(&diner), margherita()).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.post("/menu", None, margherita()).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app.get("/menu", None).await;
    assert_eq!(resp.body, json!([]));
}

#[tokio::test]
async fn test_menu_rejects_malformed_body() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;

    let resp = app
        .post("/menu", Some(&admin), json!({ "name": "No price" }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], true);
}

fn order_for(email: &str) -> Value {
    json!({
        "buyer_email": email,
        "itemsName": ["Margherita"],
        "price": 12.5,
        "image": null,
    })
}

#[tokio::test]
async fn test_orders_are_self_scoped() {
    let app = TestApp::new();
    let dee = app.token_for("dee@swiftbite.io");
    let eve = app.token_for("eve@swiftbite.io");

    let resp = app.post("/order", Some(&dee), order_for("dee@swiftbite.io")).await;
    assert_eq!(resp.status, StatusCode::OK);
    let order_id = resp.body["insertedId"].as_str().unwrap().to_string();

    // Placing an order for someone else
    let resp = app.post("/order", Some(&eve), order_for("dee@swiftbite.io")).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    // Reading someone else's orders
    let resp = app.get("/order?email=dee@swiftbite.io", Some(&eve)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.body["message"], "forbidden access");

    let resp = app.get("/order?email=dee@swiftbite.io", Some(&dee)).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["_id"], order_id.as_str());
    assert_eq!(resp.body[0]["itemsName"], json!(["Margherita"]));

    // Someone else's order counts as missing
    let resp = app.delete(&format!("/order/{order_id}"), Some(&eve)).await;
    assert_eq!(resp.body, json!({ "deletedCount": 0 }));

    let resp = app.delete(&format!("/order/{order_id}"), Some(&dee)).await;
    assert_eq!(resp.body, json!({ "deletedCount": 1 }));

    let resp = app.get("/order?email=dee@swiftbite.io", Some(&dee)).await;
    assert_eq!(resp.body, json!([]));
}

#[tokio::test]
async fn test_order_list_without_email_is_empty() {
    let app = TestApp::new();
    let dee = app.token_for("dee@swiftbite.io");
    app.post("/order", Some(&dee), order_for("dee@swiftbite.io")).await;

    let resp = app.get("/order", Some(&dee)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!([]));
}
