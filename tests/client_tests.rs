use actix_web::{web, App, HttpServer};
use tempfile::TempDir;

mod common;
use common::TestApp;

use hospital_admin::app::configure_app;
use hospital_admin::client::{ApiClient, ClientError, SessionStore};
use hospital_admin::models::{BillQuery, PatientForm, Role};

/// Serves the API on an ephemeral port and returns its base URL.
fn spawn_server(test_app: &TestApp) -> String {
    let services = test_app.services.clone();
    let jwt_manager = web::Data::new(test_app.jwt_manager.clone());

    let server = HttpServer::new(move || {
        let services = services.clone();
        let jwt_manager = jwt_manager.clone();
        App::new().configure(move |cfg| configure_app(cfg, &services, jwt_manager))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}/api", addr)
}

fn client_for(base_url: &str, dir: &TempDir) -> ApiClient {
    let store = SessionStore::load(dir.path().join("session.json")).expect("Failed to load session");
    ApiClient::new(base_url, store)
}

#[actix_web::test]
async fn test_login_persists_session() {
    let test_app = TestApp::new().await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    let user = client.login("admin", "admin").await.unwrap();
    assert_eq!(user.role, Role::Admin);
    assert!(client.session().token().is_some());

    // A new process picks the session up from disk
    let mut reopened = client_for(&base_url, &dir);
    assert_eq!(reopened.session().user().unwrap().username, "admin");
    let me = reopened.me().await.unwrap();
    assert_eq!(me.username, "admin");

    reopened.logout().await.unwrap();
    let after = client_for(&base_url, &dir);
    assert!(after.session().token().is_none());
}

#[actix_web::test]
async fn test_bad_credentials_leave_session_empty() {
    let test_app = TestApp::new().await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    match client.login("admin", "wrong").await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected 401, got {:?}", other.map(|u| u.username)),
    }
    assert!(client.session().token().is_none());
}

#[actix_web::test]
async fn test_requests_need_a_session() {
    let test_app = TestApp::new().await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    assert!(matches!(client.list_patients().await, Err(ClientError::NotLoggedIn)));
}

#[actix_web::test]
async fn test_rejected_token_signs_out() {
    let test_app = TestApp::new().await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    let user = client.login("admin", "admin").await.unwrap();
    client
        .session_mut()
        .set_auth("not-a-real-token".to_string(), user)
        .unwrap();

    assert!(matches!(client.me().await, Err(ClientError::SessionExpired)));
    assert!(client.session().token().is_none());
    assert!(client_for(&base_url, &dir).session().user().is_none());
}

#[actix_web::test]
async fn test_forbidden_calls_surface_status() {
    let test_app = TestApp::new().await;
    let admin = test_app.login_and_get_token().await;
    test_app.account(&admin, "pharma", "pharmacist", None).await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    client.login("pharma", "secret123").await.unwrap();

    match client.list_bills(&BillQuery::default()).await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 403),
        Err(e) => panic!("expected 403, got {}", e),
        Ok(_) => panic!("pharmacist listed bills"),
    }
    // A 403 keeps the session
    assert!(client.session().token().is_some());
}

#[actix_web::test]
async fn test_client_round_trip() {
    let test_app = TestApp::new().await;
    let base_url = spawn_server(&test_app);
    let dir = TempDir::new().unwrap();

    let mut client = client_for(&base_url, &dir);
    client.login("admin", "admin").await.unwrap();

    let created = client
        .create_patient(&PatientForm {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            date_of_birth: None,
            gender: None,
            phone: Some("555-0199".to_string()),
            address: None,
            national_id: None,
            blood_group: Some("O+".to_string()),
        })
        .await
        .unwrap();

    let found = client.search_patients("obi").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);

    match client.get_patient(created.id + 100).await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {:?}", other.map(|p| p.id)),
    }

    let status = client.system_status().await.unwrap();
    assert!(status.database);
}
