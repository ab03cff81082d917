use actix_web::HttpRequest;

use crate::auth::{verify_jwt, Claims, JwtManager};
use crate::domain::rbac::{self, Permission};
use crate::models::ServiceError;

pub fn authenticate_request(req: &HttpRequest, jwt_manager: &JwtManager) -> Result<Claims, ServiceError> {
    verify_jwt(req, jwt_manager)
}

/// Authenticates the caller and checks the role grants `permission`.
pub fn authorize(
    req: &HttpRequest,
    jwt_manager: &JwtManager,
    permission: Permission,
) -> Result<Claims, ServiceError> {
    authorize_any(req, jwt_manager, &[permission])
}

pub fn authorize_any(
    req: &HttpRequest,
    jwt_manager: &JwtManager,
    wanted: &[Permission],
) -> Result<Claims, ServiceError> {
    let claims = authenticate_request(req, jwt_manager)?;
    if rbac::can_any(claims.role, wanted) {
        Ok(claims)
    } else {
        tracing::warn!("{} ({}) denied {:?}", claims.sub, claims.role, wanted);
        Err(ServiceError::Forbidden(format!(
            "Role {} is not allowed to perform this action",
            claims.role
        )))
    }
}
