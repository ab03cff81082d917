use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::middleware::auth::authenticate_request;
use crate::models::{DashboardStats, DataResponse, ServiceError};
use crate::services::DashboardService;

/// Landing counters. Any signed-in role may read them.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Counters under `data`", body = DashboardStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn dashboard_api(
    dashboard_service: web::Data<DashboardService>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let stats = dashboard_service.stats().await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(stats)))
}
