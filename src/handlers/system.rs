use actix_web::{web, HttpResponse, Result};
use sqlx::SqlitePool;
use utoipa;

use crate::database;
use crate::models::{DataResponse, SystemStatus};

#[utoipa::path(
    get,
    path = "/api/system/status",
    responses(
        (status = 200, description = "Service health under `data`", body = SystemStatus)
    )
)]
pub async fn system_status(pool: web::Data<SqlitePool>) -> Result<HttpResponse> {
    let database = database::ping(&pool).await;
    if !database {
        tracing::warn!("Database ping failed");
    }

    Ok(HttpResponse::Ok().json(DataResponse::ok(SystemStatus {
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })))
}
