use crate::models::{AppointmentStatus, DashboardStats, MedicineQuery, ServiceError};
use crate::repositories::{
    AppointmentRepository, BedRepository, BillingRepository, MedicineRepository, PatientRepository,
};
use chrono::Utc;
use std::sync::Arc;

pub struct DashboardService {
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    beds: Arc<dyn BedRepository>,
    billing: Arc<dyn BillingRepository>,
    medicines: Arc<dyn MedicineRepository>,
}

impl DashboardService {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        beds: Arc<dyn BedRepository>,
        billing: Arc<dyn BillingRepository>,
        medicines: Arc<dyn MedicineRepository>,
    ) -> Self {
        Self {
            patients,
            appointments,
            beds,
            billing,
            medicines,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let open = self.appointments.find_open(None).await?;
        let today = Utc::now().date_naive();
        let in_progress = open
            .iter()
            .filter(|a| a.status == AppointmentStatus::InProgress)
            .count();
        // Queue days are UTC dates, as in the queue filter
        let waiting = open
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting && a.scheduled_at.date_naive() == today)
            .count();

        Ok(DashboardStats {
            patients: self.patients.count().await?,
            waiting,
            in_progress,
            beds: self.beds.count_by_status().await?,
            outstanding: self.billing.summary().await?.outstanding,
            low_stock: self
                .medicines
                .find_all(&MedicineQuery {
                    search: None,
                    low_stock: Some(true),
                })
                .await?,
        })
    }
}
