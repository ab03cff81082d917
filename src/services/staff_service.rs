use crate::models::{MedicalStaff, ServiceError, StaffForm, StaffUpdateForm};
use crate::repositories::StaffRepository;
use std::sync::Arc;

pub struct StaffService {
    repository: Arc<dyn StaffRepository>,
}

impl StaffService {
    pub fn new(repository: Arc<dyn StaffRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<MedicalStaff>, ServiceError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<MedicalStaff, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff member {} not found", id)))
    }

    pub async fn hire(&self, form: &StaffForm) -> Result<MedicalStaff, ServiceError> {
        if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "First and last name are required".to_string(),
            ));
        }
        if let Some(email) = &form.email {
            if !email.contains('@') {
                return Err(ServiceError::ValidationError(format!("Invalid email address {}", email)));
            }
        }

        let staff = self.repository.create(form).await?;
        tracing::info!("Added {} {} to staff as {}", staff.first_name, staff.last_name, staff.role);
        Ok(staff)
    }

    pub async fn update(&self, id: i64, form: &StaffUpdateForm) -> Result<MedicalStaff, ServiceError> {
        let current = self.get(id).await?;

        let updated = MedicalStaff {
            first_name: form.first_name.clone().unwrap_or(current.first_name.clone()),
            last_name: form.last_name.clone().unwrap_or(current.last_name.clone()),
            role: form.role.unwrap_or(current.role),
            department: form.department.clone().or(current.department.clone()),
            phone: form.phone.clone().or(current.phone.clone()),
            email: form.email.clone().or(current.email.clone()),
            active: form.active.unwrap_or(current.active),
            ..current
        };
        if updated.first_name.trim().is_empty() || updated.last_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "First and last name cannot be blank".to_string(),
            ));
        }

        self.repository.update(&updated).await?;
        tracing::info!("Updated staff member {}", id);
        Ok(updated)
    }
}
