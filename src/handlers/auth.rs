use actix_web::{web, HttpRequest, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::middleware::auth::authenticate_request;
#[allow(unused_imports)]
use crate::models::{ApiResponse, DataResponse, ErrorResponse, LoginForm, LoginResponse, ServiceError, UserProfile};
use crate::services::UserService;

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Login successful - JWT token returned in response body", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    security()
)]
pub async fn login_api(
    user_service: web::Data<UserService>,
    form: web::Json<LoginForm>,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Username and password are required".to_string(),
        ));
    }

    let user = user_service.authenticate(&form.username, &form.password).await?;

    let token = jwt_manager
        .generate_token(user.id, &user.username, user.role)
        .map_err(|e| ServiceError::InternalError(format!("Failed to generate token: {}", e)))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        expires_in: jwt_manager.ttl_seconds(),
        user: UserProfile::from_user(&user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logout successful", body = ApiResponse)
    ),
    security()
)]
pub async fn logout_api() -> Result<HttpResponse, ServiceError> {
    // Tokens are stateless; the client discards its copy
    Ok(HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: "Logout successful - discard your token".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile of the authenticated account, under `data`", body = UserProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn me_api(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    let claims = authenticate_request(&req, &jwt_manager)?;
    let profile = user_service.profile(claims.uid).await?;

    Ok(HttpResponse::Ok().json(DataResponse::ok(profile)))
}
