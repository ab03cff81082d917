use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::domain::rbac::Permission;
use crate::middleware::auth::{authorize, authorize_any};
use crate::models::{
    Appointment, AppointmentForm, AppointmentQuery, AppointmentStatus, ConsultationPaymentForm,
    DataResponse, QueueEntry, QueueQuery, ServiceError, StatusUpdateForm,
};
use crate::services::AppointmentService;

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments under `data`", body = [Appointment]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_appointments(
    appointment_service: web::Data<AppointmentService>,
    query: web::Query<AppointmentQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewAppointments)?;

    let appointments = appointment_service.list(&query).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(appointments)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/queue",
    params(QueueQuery),
    responses(
        (status = 200, description = "Open appointments in queue order under `data`", body = [QueueEntry])
    )
)]
pub async fn appointment_queue(
    appointment_service: web::Data<AppointmentService>,
    query: web::Query<QueueQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewAppointments)?;

    let queue = appointment_service.queue(&query).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(queue)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment under `data`", body = Appointment),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn get_appointment(
    appointment_service: web::Data<AppointmentService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewAppointments)?;

    let appointment = appointment_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = AppointmentForm,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 404, description = "Unknown patient or staff member")
    )
)]
pub async fn create_appointment(
    appointment_service: web::Data<AppointmentService>,
    form: web::Json<AppointmentForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageAppointments)?;

    let appointment = appointment_service.book(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(appointment, "Appointment booked")))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = i64, Path, description = "Appointment ID")),
    request_body = StatusUpdateForm,
    responses(
        (status = 200, description = "Status changed", body = Appointment),
        (status = 400, description = "Transition not allowed"),
        (status = 409, description = "Provider already in consultation")
    )
)]
pub async fn update_appointment_status(
    appointment_service: web::Data<AppointmentService>,
    path: web::Path<i64>,
    form: web::Json<StatusUpdateForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    let permission = match form.status {
        AppointmentStatus::InProgress | AppointmentStatus::Completed => Permission::RunConsultations,
        AppointmentStatus::Cancelled | AppointmentStatus::Waiting => Permission::ManageAppointments,
    };
    authorize(&req, &jwt_manager, permission)?;

    let appointment = appointment_service
        .change_status(path.into_inner(), form.status)
        .await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/appointments/{id}/pay",
    params(("id" = i64, Path, description = "Appointment ID")),
    request_body = ConsultationPaymentForm,
    responses(
        (status = 200, description = "Marked as paid", body = Appointment),
        (status = 400, description = "Already paid or cancelled")
    )
)]
pub async fn pay_appointment(
    appointment_service: web::Data<AppointmentService>,
    path: web::Path<i64>,
    form: web::Json<ConsultationPaymentForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize_any(
        &req,
        &jwt_manager,
        &[Permission::ManageAppointments, Permission::ManageBilling],
    )?;

    let appointment = appointment_service.pay(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(appointment, "Payment recorded")))
}
