use crate::domain::queue::{check_payable, check_status_change, ensure_single_active, queue_group, waiting_queue};
use crate::models::{
    Appointment, AppointmentForm, AppointmentQuery, AppointmentStatus, ConsultationPaymentForm,
    QueueEntry, QueueQuery, ServiceError,
};
use crate::repositories::{AppointmentRepository, PatientRepository, StaffRepository};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

pub struct AppointmentService {
    repository: Arc<dyn AppointmentRepository>,
    patients: Arc<dyn PatientRepository>,
    staff: Arc<dyn StaffRepository>,
}

impl AppointmentService {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        patients: Arc<dyn PatientRepository>,
        staff: Arc<dyn StaffRepository>,
    ) -> Self {
        Self {
            repository,
            patients,
            staff,
        }
    }

    pub async fn list(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, ServiceError> {
        self.repository.find(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Open appointments in queue order, annotated with patient names.
    pub async fn queue(&self, query: &QueueQuery) -> Result<Vec<QueueEntry>, ServiceError> {
        let mut open = self.repository.find_open(query.staff_id).await?;
        if let Some(date) = query.date {
            open.retain(|a| a.scheduled_at.date_naive() == date);
        }

        let mut names: HashMap<i64, String> = HashMap::new();
        let mut entries = Vec::new();
        for (index, appointment) in waiting_queue(open).into_iter().enumerate() {
            if !names.contains_key(&appointment.patient_id) {
                let name = self
                    .patients
                    .find_by_id(appointment.patient_id)
                    .await?
                    .map(|p| p.full_name())
                    .unwrap_or_else(|| format!("Patient #{}", appointment.patient_id));
                names.insert(appointment.patient_id, name);
            }

            entries.push(QueueEntry {
                position: index + 1,
                group: queue_group(&appointment),
                patient_name: names[&appointment.patient_id].clone(),
                appointment,
            });
        }

        Ok(entries)
    }

    pub async fn book(&self, form: &AppointmentForm) -> Result<Appointment, ServiceError> {
        if form.fee < 0 {
            return Err(ServiceError::ValidationError("Fee cannot be negative".to_string()));
        }
        if self.patients.find_by_id(form.patient_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("Patient {} not found", form.patient_id)));
        }
        let provider = self
            .staff
            .find_by_id(form.staff_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Staff member {} not found", form.staff_id)))?;
        if !provider.active {
            return Err(ServiceError::ValidationError(format!(
                "{} is not an active staff member",
                provider.full_name()
            )));
        }

        let scheduled_at = form.scheduled_at.unwrap_or_else(Utc::now);
        let appointment = self.repository.create(form, scheduled_at).await?;

        tracing::info!(
            "Booked appointment {} for patient {} with staff {}",
            appointment.id,
            appointment.patient_id,
            appointment.staff_id
        );
        Ok(appointment)
    }

    pub async fn change_status(
        &self,
        id: i64,
        target: AppointmentStatus,
    ) -> Result<Appointment, ServiceError> {
        let appointment = self.get(id).await?;
        check_status_change(&appointment, target).map_err(ServiceError::ValidationError)?;

        let applied = match target {
            AppointmentStatus::InProgress => {
                let open = self.repository.find_open(Some(appointment.staff_id)).await?;
                ensure_single_active(&appointment, &open).map_err(ServiceError::Conflict)?;
                self.repository.start(id).await?
            }
            AppointmentStatus::Completed => self.repository.complete(id).await?,
            AppointmentStatus::Cancelled => self.repository.cancel(id).await?,
            AppointmentStatus::Waiting => false,
        };

        if !applied {
            return Err(ServiceError::Conflict(format!(
                "Appointment {} could not be moved to {}; reload the queue",
                id, target
            )));
        }

        tracing::info!("Appointment {} is now {}", id, target);
        self.get(id).await
    }

    pub async fn pay(&self, id: i64, form: &ConsultationPaymentForm) -> Result<Appointment, ServiceError> {
        let appointment = self.get(id).await?;
        check_payable(&appointment).map_err(ServiceError::ValidationError)?;

        let applied = self
            .repository
            .mark_paid(&appointment, form.method, form.reference.as_deref())
            .await?;
        if !applied {
            return Err(ServiceError::Conflict(format!(
                "Appointment {} changed while the payment was recorded",
                id
            )));
        }

        tracing::info!("Appointment {} paid by {}", id, form.method);
        self.get(id).await
    }
}
