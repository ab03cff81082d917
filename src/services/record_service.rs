use crate::models::{AdmissionQuery, AppointmentQuery, BillQuery, Patient, PatientRecord, ServiceError};
use crate::repositories::{AppointmentRepository, BedRepository, BillingRepository, PatientRepository};
use std::sync::Arc;

pub struct RecordService {
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    beds: Arc<dyn BedRepository>,
    billing: Arc<dyn BillingRepository>,
}

impl RecordService {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        beds: Arc<dyn BedRepository>,
        billing: Arc<dyn BillingRepository>,
    ) -> Self {
        Self {
            patients,
            appointments,
            beds,
            billing,
        }
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Patient>, ServiceError> {
        let term = term.trim();
        // A bare number may be a patient id, however short
        let is_id = !term.is_empty() && term.chars().all(|c| c.is_ascii_digit());
        if term.len() < 2 && !is_id {
            return Err(ServiceError::ValidationError(
                "Search needs at least two characters".to_string(),
            ));
        }
        self.patients.search(Some(term)).await
    }

    pub async fn record(&self, patient_id: i64) -> Result<PatientRecord, ServiceError> {
        let patient = self
            .patients
            .find_by_id(patient_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Patient {} not found", patient_id)))?;

        let appointments = self
            .appointments
            .find(&AppointmentQuery {
                patient_id: Some(patient_id),
                ..Default::default()
            })
            .await?;
        let admissions = self
            .beds
            .admissions(&AdmissionQuery {
                active: None,
                patient_id: Some(patient_id),
            })
            .await?;
        let bills = self
            .billing
            .find_all(&BillQuery {
                status: None,
                patient_id: Some(patient_id),
            })
            .await?;

        Ok(PatientRecord {
            patient,
            appointments,
            admissions,
            bills,
        })
    }
}
