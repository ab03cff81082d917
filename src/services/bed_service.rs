use crate::domain::beds::{plan_transition, BedAction};
use crate::models::{Admission, AdmissionQuery, Bed, BedForm, BedStatusForm, ServiceError};
use crate::repositories::bed_repository::already_placed;
use crate::repositories::{
    AdmissionDetails, BedRepository, BillingRepository, PatientRepository, StaffRepository,
};
use std::sync::Arc;

pub struct BedService {
    repository: Arc<dyn BedRepository>,
    billing: Arc<dyn BillingRepository>,
    patients: Arc<dyn PatientRepository>,
    staff: Arc<dyn StaffRepository>,
}

impl BedService {
    pub fn new(
        repository: Arc<dyn BedRepository>,
        billing: Arc<dyn BillingRepository>,
        patients: Arc<dyn PatientRepository>,
        staff: Arc<dyn StaffRepository>,
    ) -> Self {
        Self {
            repository,
            billing,
            patients,
            staff,
        }
    }

    pub async fn list(&self) -> Result<Vec<Bed>, ServiceError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Bed, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bed {} not found", id)))
    }

    pub async fn create(&self, form: &BedForm) -> Result<Bed, ServiceError> {
        if form.label.trim().is_empty() || form.ward.trim().is_empty() {
            return Err(ServiceError::ValidationError("Bed label and ward are required".to_string()));
        }
        if form.daily_rate < 0 {
            return Err(ServiceError::ValidationError("Daily rate cannot be negative".to_string()));
        }

        let bed = self.repository.create(form).await?;
        tracing::info!("Added bed {} in ward {}", bed.label, bed.ward);
        Ok(bed)
    }

    pub async fn set_status(&self, id: i64, form: &BedStatusForm) -> Result<Bed, ServiceError> {
        let bed = self.get(id).await?;

        let bill_settled = match self.repository.active_admission(id).await? {
            Some(admission) => Some(
                self.billing
                    .find_by_id(admission.bill_id)
                    .await?
                    .map(|bill| bill.is_settled())
                    .unwrap_or(true),
            ),
            None => None,
        };

        let action = plan_transition(&bed, form.status, form.patient_id, bill_settled)
            .map_err(ServiceError::ValidationError)?;

        match action {
            BedAction::Reserve { patient_id } => {
                if self.patients.find_by_id(patient_id).await?.is_none() {
                    return Err(ServiceError::NotFound(format!("Patient {} not found", patient_id)));
                }
                self.ensure_unplaced(patient_id, &bed).await?;
            }
            BedAction::Admit { patient_id } => {
                if let Some(staff_id) = form.staff_id {
                    if self.staff.find_by_id(staff_id).await?.is_none() {
                        return Err(ServiceError::NotFound(format!("Staff member {} not found", staff_id)));
                    }
                }
                self.ensure_unplaced(patient_id, &bed).await?;
            }
            _ => {}
        }

        let details = AdmissionDetails {
            staff_id: form.staff_id,
            reason: form.reason.clone(),
        };
        let updated = self.repository.apply(&bed, action, &details).await?;

        tracing::info!("Bed {}: {} -> {} ({:?})", bed.label, bed.status, updated.status, action);
        Ok(updated)
    }

    async fn ensure_unplaced(&self, patient_id: i64, bed: &Bed) -> Result<(), ServiceError> {
        match self.repository.held_by(patient_id, bed.id).await? {
            Some(other) => Err(already_placed(patient_id, &other)),
            None => Ok(()),
        }
    }

    pub async fn admissions(&self, query: &AdmissionQuery) -> Result<Vec<Admission>, ServiceError> {
        self.repository.admissions(query).await
    }
}
