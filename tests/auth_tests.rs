use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::json;

mod common;
use common::TestApp;

#[actix_web::test]
async fn test_login_success() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({
            "username": "admin",
            "password": "admin"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["expires_in"], 12 * 3600);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["permissions"]
        .as_array()
        .unwrap()
        .contains(&json!("manage_billing")));
}

#[actix_web::test]
async fn test_login_invalid_credentials() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({
            "username": "admin",
            "password": "wrong_password"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Invalid"));
}

#[actix_web::test]
async fn test_login_missing_username() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({
            "password": "admin"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_me_returns_profile() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;

    let (status, body) = test_app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
}

#[actix_web::test]
async fn test_protected_endpoint_without_token() {
    let test_app = TestApp::new().await;

    let (status, body) = test_app.call(Method::GET, "/api/patients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_protected_endpoint_with_invalid_token() {
    let test_app = TestApp::new().await;

    let (status, _) = test_app.get("/api/dashboard", "invalid_token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let test_app = TestApp::new().await;
    let other = hospital_admin::auth::JwtManager::new("another_secret", 12);
    let token = other
        .generate_token(1, "admin", hospital_admin::models::Role::Admin)
        .unwrap();

    let (status, _) = test_app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_and_status_need_no_token() {
    let test_app = TestApp::new().await;

    let (status, body) = test_app.call(Method::POST, "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = test_app
        .call(Method::GET, "/api/system/status", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_role_without_permission_gets_forbidden() {
    let test_app = TestApp::new().await;
    let admin = test_app.login_and_get_token().await;
    let pharmacist = test_app.account(&admin, "pharma", "pharmacist", None).await;

    let (status, body) = test_app.get("/api/billing", &pharmacist).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = test_app.get("/api/medical/medicines", &pharmacist).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_dashboard_is_open_to_every_role() {
    let test_app = TestApp::new().await;
    let admin = test_app.login_and_get_token().await;
    let accountant = test_app.account(&admin, "acct", "accountant", None).await;

    let (status, body) = test_app.get("/api/dashboard", &accountant).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["patients"], 0);
    assert_eq!(body["data"]["waiting"], 0);
}
