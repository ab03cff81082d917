use actix_web::http::StatusCode;
use serde_json::json;

mod common;
use common::TestApp;

async fn set_status(test_app: &TestApp, token: &str, id: i64, status: &str) -> (StatusCode, serde_json::Value) {
    test_app
        .patch(
            &format!("/api/appointments/{}/status", id),
            token,
            json!({ "status": status }),
        )
        .await
}

#[actix_web::test]
async fn test_book_appointment_starts_waiting_and_unpaid() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;

    let id = test_app.book(&token, patient, doctor, 2500).await;

    let (status, body) = test_app.get(&format!("/api/appointments/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "waiting");
    assert_eq!(body["data"]["payment_status"], "unpaid");
    assert_eq!(body["data"]["fee"], 2500);
}

#[actix_web::test]
async fn test_booking_unknown_patient_is_not_found() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;

    let (status, _) = test_app
        .post(
            "/api/appointments",
            &token,
            json!({ "patient_id": 77, "staff_id": doctor, "fee": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_queue_orders_active_then_paid_then_unpaid() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let p1 = test_app.add_patient(&token, "Ada", "Obi").await;
    let p2 = test_app.add_patient(&token, "Bola", "Ade").await;
    let p3 = test_app.add_patient(&token, "Chi", "Eze").await;
    let p4 = test_app.add_patient(&token, "Dayo", "Ife").await;

    let unpaid = test_app.book(&token, p1, doctor, 1000).await;
    let paid = test_app.book(&token, p2, doctor, 1000).await;
    let active = test_app.book(&token, p3, doctor, 1000).await;
    let cancelled = test_app.book(&token, p4, doctor, 1000).await;

    test_app.pay_appointment(&token, paid).await;
    test_app.pay_appointment(&token, active).await;
    let (status, _) = set_status(&test_app, &token, active, "in_progress").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = set_status(&test_app, &token, cancelled, "cancelled").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = test_app
        .get(&format!("/api/appointments/queue?staff_id={}", doctor), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["appointment"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![active, paid, unpaid]);
    assert_eq!(body["data"][0]["position"], 1);
    assert_eq!(body["data"][0]["patient_name"], "Chi Eze");
}

#[actix_web::test]
async fn test_unpaid_appointment_cannot_start() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let id = test_app.book(&token, patient, doctor, 1500).await;

    let (status, body) = set_status(&test_app, &token, id, "in_progress").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("paid"));
}

#[actix_web::test]
async fn test_single_active_consultation_per_provider() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let other_doctor = test_app.add_staff(&token, "Ben", "doctor").await;
    let p1 = test_app.add_patient(&token, "Ada", "Obi").await;
    let p2 = test_app.add_patient(&token, "Bola", "Ade").await;

    let first = test_app.book(&token, p1, doctor, 0).await;
    let second = test_app.book(&token, p2, doctor, 0).await;
    let elsewhere = test_app.book(&token, p2, other_doctor, 0).await;
    for id in [first, second, elsewhere] {
        test_app.pay_appointment(&token, id).await;
    }

    let (status, _) = set_status(&test_app, &token, first, "in_progress").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = set_status(&test_app, &token, second, "in_progress").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // A different provider is unaffected
    let (status, _) = set_status(&test_app, &token, elsewhere, "in_progress").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = set_status(&test_app, &token, first, "completed").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["completed_at"].is_string());

    let (status, _) = set_status(&test_app, &token, second, "in_progress").await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_illegal_transitions_are_rejected() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let id = test_app.book(&token, patient, doctor, 0).await;

    let (status, _) = set_status(&test_app, &token, id, "completed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = set_status(&test_app, &token, id, "cancelled").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = set_status(&test_app, &token, id, "waiting").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = test_app
        .post(&format!("/api/appointments/{}/pay", id), &token, json!({ "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_paying_consultation_books_settled_bill() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let id = test_app.book(&token, patient, doctor, 3000).await;

    let (status, body) = test_app
        .post(
            &format!("/api/appointments/{}/pay", id),
            &token,
            json!({ "method": "card", "reference": "POS-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], "paid");

    let (_, body) = test_app
        .get(&format!("/api/billing?patient_id={}", patient), &token)
        .await;
    let bills = body["data"].as_array().unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0]["status"], "paid");
    assert_eq!(bills[0]["total"], 3000);
    assert_eq!(bills[0]["appointment_id"], id);

    let (status, _) = test_app
        .post(&format!("/api/appointments/{}/pay", id), &token, json!({ "method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_consultation_permissions_by_role() {
    let test_app = TestApp::new().await;
    let admin = test_app.login_and_get_token().await;
    let doctor_id = test_app.add_staff(&admin, "Grace", "doctor").await;
    let doctor = test_app.account(&admin, "grace", "doctor", Some(doctor_id)).await;
    let receptionist = test_app.account(&admin, "desk", "receptionist", None).await;
    let accountant = test_app.account(&admin, "acct", "accountant", None).await;
    let patient = test_app.add_patient(&admin, "Ada", "Obi").await;

    // Doctors run consultations but do not book them
    let (status, _) = test_app
        .post(
            "/api/appointments",
            &doctor,
            json!({ "patient_id": patient, "staff_id": doctor_id, "fee": 1000 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id = test_app.book(&receptionist, patient, doctor_id, 1000).await;

    // Accountants may take the consultation payment
    test_app.pay_appointment(&accountant, id).await;

    let (status, _) = set_status(&test_app, &receptionist, id, "in_progress").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = set_status(&test_app, &doctor, id, "in_progress").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = set_status(&test_app, &doctor, id, "cancelled").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_list_filters_by_status() {
    let test_app = TestApp::new().await;
    let token = test_app.login_and_get_token().await;
    let doctor = test_app.add_staff(&token, "Grace", "doctor").await;
    let patient = test_app.add_patient(&token, "Ada", "Obi").await;
    let kept = test_app.book(&token, patient, doctor, 0).await;
    let dropped = test_app.book(&token, patient, doctor, 0).await;
    set_status(&test_app, &token, dropped, "cancelled").await;

    let (status, body) = test_app.get("/api/appointments?status=waiting", &token).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], kept);

    let (status, _) = test_app.get("/api/appointments?status=bogus", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
