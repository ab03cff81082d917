use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::rbac::Permission;

text_enum! {
    /// Role carried by login accounts and staff records; drives the permission matrix.
    pub enum Role {
        Admin => "admin",
        Doctor => "doctor",
        Nurse => "nurse",
        Receptionist => "receptionist",
        Accountant => "accountant",
        Pharmacist => "pharmacist",
    }
}

/// Database entity representing a login account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub staff_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// What `/me` reports about the authenticated account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub staff_id: Option<i64>,
    pub permissions: Vec<Permission>,
}

impl UserProfile {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            staff_id: user.staff_id,
            permissions: crate::domain::rbac::permissions(user.role).to_vec(),
        }
    }
}
