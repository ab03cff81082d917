use std::sync::Arc;

use actix_web::web;
use sqlx::SqlitePool;

use crate::auth::JwtManager;
use crate::handlers;
use crate::models::ServiceError;
use crate::repositories::{
    SqliteAppointmentRepository, SqliteBedRepository, SqliteBillingRepository,
    SqliteMedicineRepository, SqlitePatientRepository, SqliteStaffRepository,
    SqliteUserRepository,
};
use crate::services::{
    AppointmentService, BedService, BillingService, DashboardService, PatientService,
    PharmacyService, RecordService, StaffService, UserService,
};

/// Every service, wired over one pool. Cloning is cheap; each field is an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub pool: web::Data<SqlitePool>,
    pub users: web::Data<UserService>,
    pub patients: web::Data<PatientService>,
    pub staff: web::Data<StaffService>,
    pub appointments: web::Data<AppointmentService>,
    pub billing: web::Data<BillingService>,
    pub beds: web::Data<BedService>,
    pub pharmacy: web::Data<PharmacyService>,
    pub records: web::Data<RecordService>,
    pub dashboard: web::Data<DashboardService>,
}

impl AppServices {
    pub fn new(pool: SqlitePool) -> Self {
        // Initialize repositories
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let patient_repository = Arc::new(SqlitePatientRepository::new(pool.clone()));
        let staff_repository = Arc::new(SqliteStaffRepository::new(pool.clone()));
        let appointment_repository = Arc::new(SqliteAppointmentRepository::new(pool.clone()));
        let billing_repository = Arc::new(SqliteBillingRepository::new(pool.clone()));
        let bed_repository = Arc::new(SqliteBedRepository::new(pool.clone()));
        let medicine_repository = Arc::new(SqliteMedicineRepository::new(pool.clone()));

        // Initialize services with dependency injection
        Self {
            users: web::Data::new(UserService::new(
                user_repository,
                staff_repository.clone(),
            )),
            patients: web::Data::new(PatientService::new(patient_repository.clone())),
            staff: web::Data::new(StaffService::new(staff_repository.clone())),
            appointments: web::Data::new(AppointmentService::new(
                appointment_repository.clone(),
                patient_repository.clone(),
                staff_repository.clone(),
            )),
            billing: web::Data::new(BillingService::new(
                billing_repository.clone(),
                patient_repository.clone(),
                appointment_repository.clone(),
            )),
            beds: web::Data::new(BedService::new(
                bed_repository.clone(),
                billing_repository.clone(),
                patient_repository.clone(),
                staff_repository,
            )),
            pharmacy: web::Data::new(PharmacyService::new(
                medicine_repository.clone(),
                billing_repository.clone(),
                patient_repository.clone(),
            )),
            records: web::Data::new(RecordService::new(
                patient_repository.clone(),
                appointment_repository.clone(),
                bed_repository.clone(),
                billing_repository.clone(),
            )),
            dashboard: web::Data::new(DashboardService::new(
                patient_repository,
                appointment_repository,
                bed_repository,
                billing_repository,
                medicine_repository,
            )),
            pool: web::Data::new(pool),
        }
    }
}

/// Registers shared state, extractor error handling and the `/api` routes.
/// Used by both the server binary and the integration tests.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    services: &AppServices,
    jwt_manager: web::Data<JwtManager>,
) {
    cfg.app_data(services.pool.clone())
        .app_data(jwt_manager)
        .app_data(services.users.clone())
        .app_data(services.patients.clone())
        .app_data(services.staff.clone())
        .app_data(services.appointments.clone())
        .app_data(services.billing.clone())
        .app_data(services.beds.clone())
        .app_data(services.pharmacy.clone())
        .app_data(services.records.clone())
        .app_data(services.dashboard.clone())
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ServiceError::ValidationError(format!("Invalid request body: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ServiceError::ValidationError(format!("Invalid query string: {}", err)).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            ServiceError::ValidationError(format!("Invalid path: {}", err)).into()
        }))
        .configure(handlers::configure_routes);
}
