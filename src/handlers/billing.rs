use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use utoipa::{self, IntoParams};

use crate::auth::JwtManager;
use crate::domain::rbac::Permission;
use crate::middleware::auth::authorize;
use crate::models::{
    Bill, BillForm, BillItemForm, BillQuery, DataResponse, PaymentForm, ServiceError, Transaction,
    TreasurySummary,
};
use crate::services::BillingService;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    pub bill_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/billing",
    params(BillQuery),
    responses(
        (status = 200, description = "Bills under `data` (items omitted)", body = [Bill])
    )
)]
pub async fn list_bills(
    billing_service: web::Data<BillingService>,
    query: web::Query<BillQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBilling)?;

    let bills = billing_service.list(&query).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(bills)))
}

#[utoipa::path(
    post,
    path = "/api/billing",
    request_body = BillForm,
    responses(
        (status = 201, description = "Bill created", body = Bill),
        (status = 400, description = "Invalid items")
    )
)]
pub async fn create_bill(
    billing_service: web::Data<BillingService>,
    form: web::Json<BillForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageBilling)?;

    let bill = billing_service.create(&form).await?;
    Ok(HttpResponse::Created().json(DataResponse::with_message(bill, "Bill created")))
}

#[utoipa::path(
    get,
    path = "/api/billing/{id}",
    params(("id" = i64, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill with items under `data`", body = Bill),
        (status = 404, description = "Unknown bill")
    )
)]
pub async fn get_bill(
    billing_service: web::Data<BillingService>,
    path: web::Path<i64>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBilling)?;

    let bill = billing_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(bill)))
}

#[utoipa::path(
    post,
    path = "/api/billing/{id}/items",
    params(("id" = i64, Path, description = "Bill ID")),
    request_body = BillItemForm,
    responses(
        (status = 200, description = "Item added", body = Bill)
    )
)]
pub async fn add_bill_item(
    billing_service: web::Data<BillingService>,
    path: web::Path<i64>,
    form: web::Json<BillItemForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageBilling)?;

    let bill = billing_service.add_item(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(bill, "Item added")))
}

#[utoipa::path(
    post,
    path = "/api/billing/{id}/payments",
    params(("id" = i64, Path, description = "Bill ID")),
    request_body = PaymentForm,
    responses(
        (status = 200, description = "Payment recorded", body = Bill),
        (status = 400, description = "Amount invalid or exceeds balance")
    )
)]
pub async fn pay_bill(
    billing_service: web::Data<BillingService>,
    path: web::Path<i64>,
    form: web::Json<PaymentForm>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ManageBilling)?;

    let bill = billing_service.pay(path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(DataResponse::with_message(bill, "Payment recorded")))
}

#[utoipa::path(
    get,
    path = "/api/billing/transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions under `data`, newest first", body = [Transaction])
    )
)]
pub async fn list_transactions(
    billing_service: web::Data<BillingService>,
    query: web::Query<TransactionQuery>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBilling)?;

    let transactions = billing_service.transactions(query.bill_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(transactions)))
}

#[utoipa::path(
    get,
    path = "/api/billing/summary",
    responses(
        (status = 200, description = "Treasury totals under `data`", body = TreasurySummary)
    )
)]
pub async fn treasury_summary(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authorize(&req, &jwt_manager, Permission::ViewBilling)?;

    let summary = billing_service.summary().await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(summary)))
}
