use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::domain::rbac::Permission;
use crate::middleware::auth::authorize;
use crate::models::{DataResponse, Patient, PatientForm, PatientQuery, PatientUpdateForm, ServiceError};
use crate::services::PatientService;

#[utoipa::path(
    get,
    path = "/api/patients",
    params(PatientQuery),
    responses(
        (status = 200, description = "Patients under `data`", body = [Patient]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role lacks view_patients")
    )
)]
pub async fn list_patients(
    patient_service: web::Data<PatientService>,
    query: web::Query<PatientQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewPatients)?;

    let patients = patient_service.list(query.search.as_deref()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(patients)))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = PatientForm,
    responses(
        (status = 201, description = "Patient registered", body = Patient),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "National id already registered")
    )
)]
pub async fn create_patient(
    patient_service: web::Data<PatientService>,
    form: web::Json<PatientForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManagePatients)?;

    let patient = patient_service.register(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(patient, "Patient registered")))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient under `data`", body = Patient),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn get_patient(
    patient_service: web::Data<PatientService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewPatients)?;

    let patient = patient_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(patient)))
}

#[utoipa::path(
    patch,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient ID")),
    request_body = PatientUpdateForm,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn update_patient(
    patient_service: web::Data<PatientService>,
    path: web::Path<i64>,
    form: web::Json<PatientUpdateForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManagePatients)?;

    let patient = patient_service.update(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(patient, "Patient updated")))
}
