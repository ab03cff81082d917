use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::domain::rbac::Permission;
use crate::middleware::auth::authorize;
use crate::models::{
    Admission, AdmissionQuery, Bed, BedForm, BedStatusForm, DataResponse, DispenseForm, Medicine,
    MedicineForm, MedicineQuery, Patient, PatientRecord, RecordQuery, RestockForm, ServiceError,
};
use crate::services::{BedService, PharmacyService, RecordService};

#[utoipa::path(
    get,
    path = "/api/medical/beds",
    responses(
        (status = 200, description = "Beds under `data`", body = [Bed])
    )
)]
pub async fn list_beds(
    bed_service: web::Data<BedService>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBeds)?;

    let beds = bed_service.list().await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(beds)))
}

#[utoipa::path(
    post,
    path = "/api/medical/beds",
    request_body = BedForm,
    responses(
        (status = 201, description = "Bed added", body = Bed),
        (status = 409, description = "Bed number already exists")
    )
)]
pub async fn create_bed(
    bed_service: web::Data<BedService>,
    form: web::Json<BedForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageBeds)?;

    let bed = bed_service.create(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(bed, "Bed added")))
}

#[utoipa::path(
    get,
    path = "/api/medical/beds/{id}",
    params(("id" = i64, Path, description = "Bed ID")),
    responses(
        (status = 200, description = "Bed under `data`", body = Bed),
        (status = 404, description = "Unknown bed")
    )
)]
pub async fn get_bed(
    bed_service: web::Data<BedService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBeds)?;

    let bed = bed_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(bed)))
}

#[utoipa::path(
    patch,
    path = "/api/medical/beds/{id}/status",
    params(("id" = i64, Path, description = "Bed ID")),
    request_body = BedStatusForm,
    responses(
        (status = 200, description = "Bed moved to the requested status", body = Bed),
        (status = 400, description = "Transition not allowed or bill unsettled"),
        (status = 409, description = "Bed changed concurrently")
    )
)]
pub async fn update_bed_status(
    bed_service: web::Data<BedService>,
    path: web::Path<i64>,
    form: web::Json<BedStatusForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageBeds)?;

    let bed = bed_service.set_status(path.into_inner(), &form).await?;
    let message = format!("Bed {} is now {}", bed.label, bed.status);
    Ok(HttpResponse::Ok().json(DataResponse::with_message(bed, message)))
}

#[utoipa::path(
    get,
    path = "/api/medical/admissions",
    params(AdmissionQuery),
    responses(
        (status = 200, description = "Admissions under `data`", body = [Admission])
    )
)]
pub async fn list_admissions(
    bed_service: web::Data<BedService>,
    query: web::Query<AdmissionQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBeds)?;

    let admissions = bed_service.admissions(&query).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(admissions)))
}

#[utoipa::path(
    get,
    path = "/api/medical/medicines",
    params(MedicineQuery),
    responses(
        (status = 200, description = "Medicines under `data`", body = [Medicine])
    )
)]
pub async fn list_medicines(
    pharmacy_service: web::Data<PharmacyService>,
    query: web::Query<MedicineQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewPharmacy)?;

    let medicines = pharmacy_service.list(&query).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(medicines)))
}

#[utoipa::path(
    post,
    path = "/api/medical/medicines",
    request_body = MedicineForm,
    responses(
        (status = 201, description = "Medicine added", body = Medicine)
    )
)]
pub async fn create_medicine(
    pharmacy_service: web::Data<PharmacyService>,
    form: web::Json<MedicineForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManagePharmacy)?;

    let medicine = pharmacy_service.create(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(medicine, "Medicine added")))
}

#[utoipa::path(
    post,
    path = "/api/medical/medicines/{id}/dispense",
    params(("id" = i64, Path, description = "Medicine ID")),
    request_body = DispenseForm,
    responses(
        (status = 200, description = "Stock after dispensing", body = Medicine),
        (status = 400, description = "Insufficient stock")
    )
)]
pub async fn dispense_medicine(
    pharmacy_service: web::Data<PharmacyService>,
    path: web::Path<i64>,
    form: web::Json<DispenseForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::DispenseMedicine)?;

    let medicine = pharmacy_service.dispense(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(medicine, "Medicine dispensed")))
}

#[utoipa::path(
    post,
    path = "/api/medical/medicines/{id}/restock",
    params(("id" = i64, Path, description = "Medicine ID")),
    request_body = RestockForm,
    responses(
        (status = 200, description = "Stock after restocking", body = Medicine)
    )
)]
pub async fn restock_medicine(
    pharmacy_service: web::Data<PharmacyService>,
    path: web::Path<i64>,
    form: web::Json<RestockForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManagePharmacy)?;

    let medicine = pharmacy_service
        .restock(path.into_inner(), form.quantity)
        .await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(medicine, "Stock updated")))
}

#[utoipa::path(
    get,
    path = "/api/medical/records",
    params(RecordQuery),
    responses(
        (status = 200, description = "Matching patients under `data`", body = [Patient]),
        (status = 400, description = "Search term too short")
    )
)]
pub async fn search_records(
    record_service: web::Data<RecordService>,
    query: web::Query<RecordQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewRecords)?;

    let patients = record_service.search(&query.q).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(patients)))
}

#[utoipa::path(
    get,
    path = "/api/medical/records/{patient_id}",
    params(("patient_id" = i64, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Consolidated record under `data`", body = PatientRecord),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_record(
    record_service: web::Data<RecordService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewRecords)?;

    let record = record_service.record(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(record)))
}
