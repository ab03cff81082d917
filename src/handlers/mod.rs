pub mod appointments;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod medical;
pub mod patients;
pub mod staff;
pub mod system;

// Re-export all handler functions for easy importing
pub use appointments::*;
pub use auth::*;
pub use billing::*;
pub use dashboard::*;
pub use medical::*;
pub use patients::*;
pub use staff::*;
pub use system::*;

use actix_web::web;

/// Mounts every endpoint under `/api`. Literal segments are registered
/// before their `{id}` siblings so they are matched first.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/login", web::post().to(login_api))
            .route("/logout", web::post().to(logout_api))
            .route("/me", web::get().to(me_api))
            .route("/dashboard", web::get().to(dashboard_api))
            .route("/system/status", web::get().to(system_status))
            .route("/patients", web::get().to(list_patients))
            .route("/patients", web::post().to(create_patient))
            .route("/patients/{id}", web::get().to(get_patient))
            .route("/patients/{id}", web::patch().to(update_patient))
            .route("/appointments", web::get().to(list_appointments))
            .route("/appointments", web::post().to(create_appointment))
            .route("/appointments/queue", web::get().to(appointment_queue))
            .route("/appointments/{id}", web::get().to(get_appointment))
            .route("/appointments/{id}/status", web::patch().to(update_appointment_status))
            .route("/appointments/{id}/pay", web::post().to(pay_appointment))
            .route("/billing", web::get().to(list_bills))
            .route("/billing", web::post().to(create_bill))
            .route("/billing/transactions", web::get().to(list_transactions))
            .route("/billing/summary", web::get().to(treasury_summary))
            .route("/billing/{id}", web::get().to(get_bill))
            .route("/billing/{id}/items", web::post().to(add_bill_item))
            .route("/billing/{id}/payments", web::post().to(pay_bill))
            .route("/staff", web::get().to(list_staff))
            .route("/staff", web::post().to(create_staff))
            .route("/staff/{id}", web::get().to(get_staff))
            .route("/staff/{id}", web::patch().to(update_staff))
            .route("/users", web::post().to(create_user))
            .route("/medical/beds", web::get().to(list_beds))
            .route("/medical/beds", web::post().to(create_bed))
            .route("/medical/beds/{id}", web::get().to(get_bed))
            .route("/medical/beds/{id}/status", web::patch().to(update_bed_status))
            .route("/medical/admissions", web::get().to(list_admissions))
            .route("/medical/medicines", web::get().to(list_medicines))
            .route("/medical/medicines", web::post().to(create_medicine))
            .route("/medical/medicines/{id}/dispense", web::post().to(dispense_medicine))
            .route("/medical/medicines/{id}/restock", web::post().to(restock_medicine))
            .route("/medical/records", web::get().to(search_records))
            .route("/medical/records/{patient_id}", web::get().to(patient_record)),
    );
}
