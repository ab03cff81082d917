#![allow(dead_code)]

use actix_web::http::{Method, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

use hospital_admin::{
    app::{configure_app, AppServices},
    auth::JwtManager,
    database,
};

pub struct TestApp {
    pub pool: SqlitePool,
    pub services: AppServices,
    pub jwt_manager: JwtManager,
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        // Create temporary database
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

        // Pool, foreign keys and migrations exactly as the server sets them up
        let pool = database::initialize_database(&database_url)
            .await
            .expect("Failed to initialize database");

        let services = AppServices::new(pool.clone());

        // Default admin account (admin/admin for testing)
        services
            .users
            .bootstrap_admin("admin", "admin")
            .await
            .expect("Failed to create admin account");

        let jwt_manager = JwtManager::new("test_secret_key", 12);

        Self {
            pool,
            services,
            jwt_manager,
            temp_dir,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let services = self.services.clone();
        let jwt_manager = web::Data::new(self.jwt_manager.clone());

        App::new().configure(move |cfg| configure_app(cfg, &services, jwt_manager))
    }

    /// Sends one request through a fresh service and returns status plus JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let app = test::init_service(self.create_app()).await;

        let mut req = test::TestRequest::default().method(method).uri(uri);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", format!("Bearer {}", token)));
        }
        if let Some(body) = body {
            req = req.set_json(body);
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    pub async fn login_and_get_token(&self) -> String {
        self.login("admin", "admin").await
    }

    pub async fn add_staff(&self, token: &str, first_name: &str, role: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/staff",
                token,
                json!({
                    "first_name": first_name,
                    "last_name": "Tester",
                    "role": role,
                    "department": "General"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    /// Creates a login for `role` and returns its token.
    pub async fn account(&self, admin_token: &str, username: &str, role: &str, staff_id: Option<i64>) -> String {
        let (status, body) = self
            .post(
                "/api/users",
                admin_token,
                json!({
                    "username": username,
                    "password": "secret123",
                    "role": role,
                    "staff_id": staff_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        self.login(username, "secret123").await
    }

    pub async fn add_patient(&self, token: &str, first_name: &str, last_name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/patients",
                token,
                json!({
                    "first_name": first_name,
                    "last_name": last_name,
                    "date_of_birth": "1990-04-12",
                    "phone": "555-0101"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn book(&self, token: &str, patient_id: i64, staff_id: i64, fee: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/appointments",
                token,
                json!({
                    "patient_id": patient_id,
                    "staff_id": staff_id,
                    "reason": "Check-up",
                    "fee": fee
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn pay_appointment(&self, token: &str, appointment_id: i64) {
        let (status, body) = self
            .post(
                &format!("/api/appointments/{}/pay", appointment_id),
                token,
                json!({ "method": "cash" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    pub async fn add_bed(&self, token: &str, label: &str, daily_rate: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/medical/beds",
                token,
                json!({ "label": label, "ward": "General", "daily_rate": daily_rate }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn set_bed(&self, token: &str, bed_id: i64, body: Value) -> (StatusCode, Value) {
        self.patch(&format!("/api/medical/beds/{}/status", bed_id), token, body)
            .await
    }
}
