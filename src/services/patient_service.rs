use crate::models::{Patient, PatientForm, PatientUpdateForm, ServiceError};
use crate::repositories::PatientRepository;
use std::sync::Arc;

pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Patient>, ServiceError> {
        self.repository.search(search).await
    }

    pub async fn get(&self, id: i64) -> Result<Patient, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Patient {} not found", id)))
    }

    pub async fn register(&self, form: &PatientForm) -> Result<Patient, ServiceError> {
        if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "First and last name are required".to_string(),
            ));
        }

        let patient = self.repository.create(form).await?;
        tracing::info!("Registered patient {} ({})", patient.id, patient.full_name());
        Ok(patient)
    }

    pub async fn update(&self, id: i64, form: &PatientUpdateForm) -> Result<Patient, ServiceError> {
        let current = self.get(id).await?;

        let first_name = form.first_name.clone().unwrap_or(current.first_name.clone());
        let last_name = form.last_name.clone().unwrap_or(current.last_name.clone());
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "First and last name cannot be blank".to_string(),
            ));
        }

        let updated = Patient {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            date_of_birth: form.date_of_birth.or(current.date_of_birth),
            gender: form.gender.clone().or(current.gender.clone()),
            phone: form.phone.clone().or(current.phone.clone()),
            address: form.address.clone().or(current.address.clone()),
            national_id: form.national_id.clone().or(current.national_id.clone()),
            blood_group: form.blood_group.clone().or(current.blood_group.clone()),
            ..current
        };

        self.repository.update(&updated).await?;
        tracing::info!("Updated patient {}", id);
        Ok(updated)
    }

    pub async fn count(&self) -> Result<i64, ServiceError> {
        self.repository.count().await
    }
}
