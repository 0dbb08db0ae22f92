mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

use common::TestContext;
use tea_shop_backend::app::app::build_router;
use tea_shop_backend::util::jwt::JwtTokenUtils;

fn app(ctx: &TestContext) -> Router {
    build_router(ctx.services.clone(), ctx.jwt_utils.clone())
}

fn bearer(ctx: &TestContext, role: &str) -> String {
    let pair = ctx
        .jwt_utils
        .generate_token_pair("65f0c0ffee0000000000abcd", "staff@shop.com", role)
        .unwrap();
    format!("Bearer {}", pair.access_token)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_and_login_over_http() {
    let ctx = TestContext::new();
    let (status, body) = send(
        app(&ctx),
        json_request("POST", "/api/signup", json!({ "email": "Latte@Shop.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "latte@shop.com");
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["_id"].as_str().unwrap().len(), 24);

    let (status, body) = send(
        app(&ctx),
        json_request("POST", "/api/login", json!({ "email": "latte@shop.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tokens"]["accessToken"].is_string());
    assert_eq!(body["tokens"]["tokenType"], "Bearer");

    let (status, body) = send(
        app(&ctx),
        json_request("POST", "/api/login", json!({ "email": "latte@shop.com", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_signup_cannot_request_admin_role() {
    let ctx = TestContext::new();
    let (status, body) = send(
        app(&ctx),
        json_request("POST", "/api/signup", json!({ "email": "x@shop.com", "password": "secret1", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
    assert!(ctx.users.stored("x@shop.com").is_none());

    let (status, _) = send(
        app(&ctx),
        json_request("POST", "/api/signup", json!({ "email": "x@shop.com", "password": "secret1", "role": "barista" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app(&ctx),
        json_request("POST", "/api/signup", json!({ "email": "x@shop.com", "password": "secret1", "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn test_duplicate_signup_returns_conflict() {
    let ctx = TestContext::new();
    let body = json!({ "email": "x@shop.com", "password": "secret1" });
    let (first, _) = send(app(&ctx), json_request("POST", "/api/signup", body.clone())).await;
    let (second, _) = send(app(&ctx), json_request("POST", "/api/signup", body)).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_routes_require_admin_token() {
    let ctx = TestContext::new();

    let req = Request::builder().uri("/api/inventory").body(Body::empty()).unwrap();
    let (status, _) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/inventory")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/orders/all")
        .header("authorization", bearer(&ctx, "user"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = Request::builder()
        .uri("/api/orders/reports/sales-by-month")
        .header("authorization", bearer(&ctx, "admin"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "labels": ["No Data"], "datasets": [{ "data": [0.0] }] }));
}

#[tokio::test]
async fn test_public_product_listing() {
    let ctx = TestContext::new();
    let mut add = json_request(
        "POST",
        "/api/product/add",
        json!({ "name": "Brown Sugar", "category": "Milk Tea", "medium": "45" }),
    );
    add.headers_mut().insert("authorization", bearer(&ctx, "admin").parse().unwrap());
    let (status, created) = send(app(&ctx), add).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Available");

    let req = Request::builder().uri("/api/product/fetch").body(Body::empty()).unwrap();
    let (status, body) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Brown Sugar");
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let ctx = TestContext::new();
    let req = Request::builder()
        .method("PATCH")
        .uri("/api/cart/increment/not-an-id")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id");
}

#[tokio::test]
async fn test_cart_to_order_over_http() {
    let ctx = TestContext::new();
    let user_id = "65f0c0ffee0000000000abcd";
    let add = |name: &str| {
        json_request(
            "POST",
            "/api/cart/add",
            json!({
                "userId": user_id,
                "productId": "65f0c0ffee0000000000ef01",
                "name": name,
                "selectedSize": "Large",
                "addons": ["Pearl"],
                "totalPrice": 50.0,
                "quantity": 2
            }),
        )
    };
    let (status, first) = send(app(&ctx), add("Okinawa")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = send(app(&ctx), add("Hokkaido")).await;

    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/cart/decrement/{}", second["_id"].as_str().unwrap()))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["quantity"], 1);

    let (status, body) = send(
        app(&ctx),
        json_request(
            "POST",
            "/api/orders/create",
            json!({ "userId": user_id, "cartItemIds": [first["_id"], "garbage"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["grandTotal"], 100.0);
    assert_eq!(body["order"]["status"], "Preparing");

    let req = Request::builder().uri(format!("/api/cart/{}", user_id)).body(Body::empty()).unwrap();
    let (_, cart) = send(app(&ctx), req).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["name"], "Hokkaido");

    let req = Request::builder().uri(format!("/api/orders/{}", user_id)).body(Body::empty()).unwrap();
    let (status, orders) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let ctx = TestContext::new();
    let (status, _) = send(
        app(&ctx),
        json_request(
            "POST",
            "/api/orders/create",
            json!({ "userId": "65f0c0ffee0000000000abcd", "cartItemIds": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_purchase_stats_over_http() {
    let ctx = TestContext::new();
    let mut record = json_request(
        "POST",
        "/api/purchase",
        json!({ "items": [{ "name": "Matcha", "quantity": 2, "price": 45.0 }], "paymentMethod": "Cash" }),
    );
    record.headers_mut().insert("authorization", bearer(&ctx, "admin").parse().unwrap());
    let (status, created) = send(app(&ctx), record).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["total"], 90.0);

    let req = Request::builder()
        .uri("/api/purchase/stats?range=year")
        .header("authorization", bearer(&ctx, "admin"))
        .body(Body::empty())
        .unwrap();
    let (status, stats) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["labels"].as_array().unwrap().len(), 12);
    assert_eq!(stats["totalSales"], 90.0);

    let req = Request::builder()
        .uri("/api/purchase/stats?range=fortnight")
        .header("authorization", bearer(&ctx, "admin"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&ctx), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
