use actix_web::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::TestApp;

async fn open_bill(test_app: &TestApp, token: &str, patient_id: i64) -> Value {
    let (status, body) = test_app
        .post(
            "/api/billing",
            token,
            json!({
                "patient_id": patient_id,
                "items": [
                    { "description": "Blood panel", "quantity": 1, "unit_price": 4000 },
                    { "description": "Dressing", "quantity": 3, "unit_price": 500 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[actix_web::test]
async fn test_create_bill_totals_items() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;

    let bill = open_bill(&test_app, &token, patient).await;
    assert_eq!(bill["total"], 5500);
    assert_eq!(bill["paid_amount"], 0);
    assert_eq!(bill["status"], "unpaid");
    assert_eq!(bill["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_bill_validation() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;

    let (status, _) = test_app
        .post("/api/billing", &token, json!({ "patient_id": patient, "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_app
        .post(
            "/api/billing",
            &token,
            json!({ "patient_id": patient, "items": [{ "description": "X", "quantity": 0, "unit_price": 100 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_app
        .post(
            "/api/billing",
            &token,
            json!({ "patient_id": 999, "items": [{ "description": "X", "quantity": 1, "unit_price": 100 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_partial_then_full_payment() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let bill_id = open_bill(&test_app, &token, patient).await["id"].as_i64().unwrap();
    let payments = format!("/api/billing/{}/payments", bill_id);

    let (status, body) = test_app
        .post(&payments, &token, json!({ "amount": 2000, "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "partial");
    assert_eq!(body["data"]["paid_amount"], 2000);

    // Overpaying is refused
    let (status, body) = test_app
        .post(&payments, &token, json!({ "amount": 4000, "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("35.00"));

    let (status, body) = test_app
        .post(&payments, &token, json!({ "amount": 3500, "method": "card", "reference": "POS-9" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");

    let (status, _) = test_app
        .post(&payments, &token, json!({ "amount": 1, "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = test_app
        .get(&format!("/api/billing/transactions?bill_id={}", bill_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["data"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["reference"], "POS-9");
}

#[actix_web::test]
async fn test_adding_item_reopens_paid_bill() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let bill_id = open_bill(&test_app, &token, patient).await["id"].as_i64().unwrap();
    test_app
        .post(
            &format!("/api/billing/{}/payments", bill_id),
            &token,
            json!({ "amount": 5500, "method": "transfer" }),
        )
        .await;

    let (status, body) = test_app
        .post(
            &format!("/api/billing/{}/items", bill_id),
            &token,
            json!({ "description": "X-ray", "quantity": 1, "unit_price": 1500 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 7000);
    assert_eq!(body["data"]["status"], "partial");

    let (status, _) = test_app
        .post(
            "/api/billing/999/items",
            &token,
            json!({ "description": "X-ray", "quantity": 1, "unit_price": 1500 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_treasury_summary() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let first = open_bill(&test_app, &token, patient).await["id"].as_i64().unwrap();
    open_bill(&test_app, &token, patient).await;
    test_app
        .post(
            &format!("/api/billing/{}/payments", first),
            &token,
            json!({ "amount": 5500, "method": "cash" }),
        )
        .await;

    let (status, body) = test_app.get("/api/billing/summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_billed"], 11000);
    assert_eq!(body["data"]["total_collected"], 5500);
    assert_eq!(body["data"]["outstanding"], 5500);
    assert_eq!(body["data"]["unpaid_bills"], 1);
    assert_eq!(body["data"]["by_method"][0]["method"], "cash");
    assert_eq!(body["data"]["by_method"][0]["amount"], 5500);

    let (_, body) = test_app.get("/api/billing?status=unpaid", &token).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_billing_roles() {
    let test_app = TestApp::new().await;
    let admin = test_app.login_and_get_token().await;
    let receptionist = test_app.account(&admin, "desk", "receptionist", None).await;
    let accountant = test_app.account(&admin, "acct", "accountant", None).await;
    let patient = test_app.add_patient(&admin, "Ada", "Obi").await;
    let bill_id = open_bill(&test_app, &accountant, patient).await["id"].as_i64().unwrap();

    let (status, _) = test_app.get(&format!("/api/billing/{}", bill_id), &receptionist).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = test_app
        .post(
            &format!("/api/billing/{}/payments", bill_id),
            &receptionist,
            json!({ "amount": 100, "method": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_bill_appointment_must_match_patient() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let ada = test_app.add_patient(&token, "Ada", "Obi").await;
    let ben = test_app.add_patient(&token, "Ben", "Eze").await;
    let appointment = test_app.book(&token, ada, doctor, 0).await;
    let item = json!([{ "description": "Suture kit", "quantity": 1, "unit_price": 1200 }]);

    let (status, body) = test_app
        .post(
            "/api/billing",
            &token,
            json!({ "patient_id": ada, "appointment_id": 9999, "items": item }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("Appointment 9999"));

    let (status, _) = test_app
        .post(
            "/api/billing",
            &token,
            json!({ "patient_id": ben, "appointment_id": appointment, "items": item }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = test_app
        .post(
            "/api/billing",
            &token,
            json!({ "patient_id": ada, "appointment_id": appointment, "items": item }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["appointment_id"], appointment);
}
