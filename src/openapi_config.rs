use std::collections::BTreeMap;

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::OpenApi;

use crate::domain::rbac::Permission;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital Admin API",
        description = "Patients, consultations, admissions, billing, staff and pharmacy"
    ),
    paths(
        handlers::auth::login_api,
        handlers::auth::logout_api,
        handlers::auth::me_api,
        handlers::dashboard::dashboard_api,
        handlers::system::system_status,
        handlers::patients::list_patients,
        handlers::patients::create_patient,
        handlers::patients::get_patient,
        handlers::patients::update_patient,
        handlers::appointments::list_appointments,
        handlers::appointments::appointment_queue,
        handlers::appointments::get_appointment,
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment_status,
        handlers::appointments::pay_appointment,
        handlers::billing::list_bills,
        handlers::billing::create_bill,
        handlers::billing::get_bill,
        handlers::billing::add_bill_item,
        handlers::billing::pay_bill,
        handlers::billing::list_transactions,
        handlers::billing::treasury_summary,
        handlers::staff::list_staff,
        handlers::staff::create_staff,
        handlers::staff::get_staff,
        handlers::staff::update_staff,
        handlers::staff::create_user,
        handlers::medical::list_beds,
        handlers::medical::create_bed,
        handlers::medical::get_bed,
        handlers::medical::update_bed_status,
        handlers::medical::list_admissions,
        handlers::medical::list_medicines,
        handlers::medical::create_medicine,
        handlers::medical::dispense_medicine,
        handlers::medical::restock_medicine,
        handlers::medical::search_records,
        handlers::medical::patient_record,
    ),
    components(schemas(
        ApiResponse, ErrorResponse, LoginForm, LoginResponse, UserProfile, CreateUserForm,
        Role, Permission,
        Patient, PatientForm, PatientUpdateForm, PatientRecord,
        MedicalStaff, StaffForm, StaffUpdateForm,
        Appointment, AppointmentForm, AppointmentStatus, PaymentStatus, StatusUpdateForm,
        ConsultationPaymentForm, QueueEntry,
        Bill, BillItem, BillForm, BillItemForm, BillStatus, PaymentForm, PaymentMethod,
        Transaction, TreasurySummary, MethodTotal,
        Bed, BedForm, BedStatus, BedStatusForm, BedCount, Admission,
        Medicine, MedicineForm, DispenseForm, RestockForm,
        DashboardStats, SystemStatus,
    )),
    tags(
        (name = "hospital-admin", description = "Hospital administration endpoints")
    )
)]
pub struct ApiDoc;

pub fn configure_openapi(mut openapi: utoipa::openapi::OpenApi) -> utoipa::openapi::OpenApi {
    // Bearer token security scheme (HTTP Bearer type, not ApiKey)
    let mut security_schemes = BTreeMap::new();
    security_schemes.insert(
        "bearer_auth".to_string(),
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("Token returned by /api/login"))
                .build(),
        ),
    );

    if let Some(components) = openapi.components.as_mut() {
        components.security_schemes = security_schemes;
    }

    openapi.security = Some(vec![SecurityRequirement::new(
        "bearer_auth",
        Vec::<String>::new(),
    )]);

    openapi
}

/// The documented API with auth applied, ready to hand to Swagger UI.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    configure_openapi(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_bearer_auth_and_routes() {
        let doc = api_doc();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/appointments/queue"));
        assert!(doc.paths.paths.contains_key("/api/medical/beds/{id}/status"));
    }
}
