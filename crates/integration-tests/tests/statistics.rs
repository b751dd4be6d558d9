//! Diner statistics, booking history, and platform statistics.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use swiftbite_integration_tests::TestApp;

const DINER: &str = "dee@swiftbite.io";

async fn seed_menu(app: &TestApp, admin: &str) {
    for (name, price) in [("Margherita", 12.5), ("Calzone", 9.0)] {
        app.post(
            "/menu",
            Some(admin),
            json!({ "name": name, "price": price, "category": "pizza" }),
        )
        .await;
    }
}

async fn settle(app: &TestApp, token: &str, names: &[&str], price: f64) {
    let resp = app
        .post(
            "/order",
            Some(token),
            json!({ "buyer_email": DINER, "itemsName": names, "price": price }),
        )
        .await;
    let order_id = resp.body["insertedId"].clone();

    let resp = app
        .post(
            "/payment",
            Some(token),
            json!({
                "email": DINER,
                "itemsName": names,
                "price": price,
                "orderItems": [order_id],
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_statistics() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;
    let token = app.token_for(DINER);
    seed_menu(&app, &admin).await;

    settle(&app, &token, &["Margherita", "Calzone"], 21.5).await;
    settle(&app, &token, &["Margherita"], 12.5).await;

    let resp = app
        .get(&format!("/user-statistics/{DINER}"), Some(&token))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({ "totalRevenue": "34.00", "totalItemCount": 3, "menuItemsCount": 2 })
    );
}

#[tokio::test]
async fn test_user_statistics_mismatch_is_unauthorized() {
    let app = TestApp::new();
    let eve = app.token_for("eve@swiftbite.io");

    let resp = app.get(&format!("/user-statistics/{DINER}"), Some(&eve)).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "unauthorized access!");
}

#[tokio::test]
async fn test_booking_history_joins_catalog() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;
    let token = app.token_for(DINER);
    seed_menu(&app, &admin).await;

    settle(&app, &token, &["Margherita", "Discontinued"], 20.0).await;

    let resp = app
        .get(&format!("/bookingHistory/{DINER}"), Some(&token))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let entries = resp.body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["itemsName"], "Margherita");
    assert_eq!(entries[0]["detailedMenuItems"]["name"], "Margherita");
    assert_eq!(entries[0]["detailedMenuItems"]["price"], 12.5);

    let eve = app.token_for("eve@swiftbite.io");
    let resp = app.get(&format!("/bookingHistory/{DINER}"), Some(&eve)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_statistics() {
    let app = TestApp::new();
    let admin = app.admin("owner@swiftbite.io").await;
    app.register(DINER).await;
    let token = app.token_for(DINER);
    seed_menu(&app, &admin).await;

    settle(&app, &token, &["Margherita"], 12.5).await;
    app.post(
        "/order",
        Some(&token),
        json!({ "buyer_email": DINER, "itemsName": ["Calzone"], "price": 9.0 }),
    )
    .await;

    let resp = app.get("/admin-statistics", Some(&admin)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({ "user": 2, "menuItems": 2, "orders": 1, "revenue": 12.5 })
    );

    let resp = app.get("/admin-statistics", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}
