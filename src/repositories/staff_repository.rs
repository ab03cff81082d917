use crate::models::{MedicalStaff, ServiceError, StaffForm};
use async_trait::async_trait;
use sqlx::SqlitePool;

const STAFF_COLUMNS: &str =
    "id, first_name, last_name, role, department, phone, email, active, hired_on";

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<MedicalStaff>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<MedicalStaff>, ServiceError>;
    async fn create(&self, form: &StaffForm) -> Result<MedicalStaff, ServiceError>;
    async fn update(&self, staff: &MedicalStaff) -> Result<(), ServiceError>;
}

pub struct SqliteStaffRepository {
    pool: SqlitePool,
}

impl SqliteStaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for SqliteStaffRepository {
    async fn find_all(&self) -> Result<Vec<MedicalStaff>, ServiceError> {
        let staff = sqlx::query_as::<_, MedicalStaff>(&format!(
            "SELECT {} FROM medical_staff ORDER BY last_name, first_name",
            STAFF_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MedicalStaff>, ServiceError> {
        let staff = sqlx::query_as::<_, MedicalStaff>(&format!(
            "SELECT {} FROM medical_staff WHERE id = ?",
            STAFF_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn create(&self, form: &StaffForm) -> Result<MedicalStaff, ServiceError> {
        let staff = sqlx::query_as::<_, MedicalStaff>(&format!(
            "INSERT INTO medical_staff (first_name, last_name, role, department, phone, email, active, hired_on)
             VALUES (?, ?, ?, ?, ?, ?, 1, ?)
             RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(form.first_name.trim())
        .bind(form.last_name.trim())
        .bind(form.role.as_str())
        .bind(&form.department)
        .bind(&form.phone)
        .bind(&form.email)
        .bind(form.hired_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn update(&self, staff: &MedicalStaff) -> Result<(), ServiceError> {
        sqlx::query(
            "UPDATE medical_staff SET first_name = ?, last_name = ?, role = ?, department = ?,
                    phone = ?, email = ?, active = ?
             WHERE id = ?",
        )
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(staff.role.as_str())
        .bind(&staff.department)
        .bind(&staff.phone)
        .bind(&staff.email)
        .bind(staff.active)
        .bind(staff.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
