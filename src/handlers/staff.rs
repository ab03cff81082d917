use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::domain::rbac::Permission;
use crate::middleware::auth::authorize;
use crate::models::{
    CreateUserForm, DataResponse, MedicalStaff, ServiceError, StaffForm, StaffUpdateForm,
    UserProfile,
};
use crate::services::{StaffService, UserService};

#[utoipa::path(
    get,
    path = "/api/staff",
    responses(
        (status = 200, description = "Staff under `data`", body = [MedicalStaff])
    )
)]
pub async fn list_staff(
    staff_service: web::Data<StaffService>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewStaff)?;

    let staff = staff_service.list().await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(staff)))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = StaffForm,
    responses(
        (status = 201, description = "Staff member added", body = MedicalStaff),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_staff(
    staff_service: web::Data<StaffService>,
    form: web::Json<StaffForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageStaff)?;

    let staff = staff_service.hire(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(staff, "Staff member added")))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(("id" = i64, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member under `data`", body = MedicalStaff),
        (status = 404, description = "Unknown staff member")
    )
)]
pub async fn get_staff(
    staff_service: web::Data<StaffService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewStaff)?;

    let staff = staff_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(staff)))
}

#[utoipa::path(
    patch,
    path = "/api/staff/{id}",
    params(("id" = i64, Path, description = "Staff ID")),
    request_body = StaffUpdateForm,
    responses(
        (status = 200, description = "Staff member updated", body = MedicalStaff)
    )
)]
pub async fn update_staff(
    staff_service: web::Data<StaffService>,
    path: web::Path<i64>,
    form: web::Json<StaffUpdateForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageStaff)?;

    let staff = staff_service.update(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(staff, "Staff member updated")))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserForm,
    responses(
        (status = 201, description = "Login account created", body = UserProfile),
        (status = 409, description = "Username taken")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    form: web::Json<CreateUserForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageStaff)?;

    let profile = user_service.create_user(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(profile, "Account created")))
}
