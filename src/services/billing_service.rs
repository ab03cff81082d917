use crate::domain::billing::{bill_total, format_cents, validate_item};
use crate::models::{
    Bill, BillForm, BillItemForm, BillQuery, PaymentForm, ServiceError, Transaction,
    TreasurySummary,
};
use crate::repositories::{AppointmentRepository, BillingRepository, PatientRepository};
use std::sync::Arc;

pub struct BillingService {
    repository: Arc<dyn BillingRepository>,
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl BillingService {
    pub fn new(
        repository: Arc<dyn BillingRepository>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            repository,
            patients,
            appointments,
        }
    }

    pub async fn list(&self, query: &BillQuery) -> Result<Vec<Bill>, ServiceError> {
        self.repository.find_all(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Bill, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", id)))
    }

    pub async fn create(&self, form: &BillForm) -> Result<Bill, ServiceError> {
        if form.items.is_empty() {
            return Err(ServiceError::ValidationError("A bill needs at least one item".to_string()));
        }
        for item in &form.items {
            validate_item(&item.description, item.quantity, item.unit_price)
                .map_err(ServiceError::ValidationError)?;
        }
        bill_total(form.items.iter().map(|item| (item.quantity, item.unit_price)))
            .map_err(ServiceError::ValidationError)?;
        if self.patients.find_by_id(form.patient_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("Patient {} not found", form.patient_id)));
        }
        if let Some(appointment_id) = form.appointment_id {
            let appointment = self
                .appointments
                .find_by_id(appointment_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Appointment {} not found", appointment_id)))?;
            if appointment.patient_id != form.patient_id {
                return Err(ServiceError::ValidationError(format!(
                    "Appointment {} belongs to another patient",
                    appointment_id
                )));
            }
        }

        let bill = self
            .repository
            .create(form.patient_id, form.appointment_id, &form.items)
            .await?;
        tracing::info!(
            "Created bill {} for patient {} totalling {}",
            bill.id,
            bill.patient_id,
            format_cents(bill.total)
        );
        Ok(bill)
    }

    pub async fn add_item(&self, bill_id: i64, item: &BillItemForm) -> Result<Bill, ServiceError> {
        validate_item(&item.description, item.quantity, item.unit_price)
            .map_err(ServiceError::ValidationError)?;

        let bill = self.repository.add_item(bill_id, item).await?;
        tracing::info!("Added '{}' to bill {}", item.description, bill_id);
        Ok(bill)
    }

    pub async fn pay(&self, bill_id: i64, payment: &PaymentForm) -> Result<Bill, ServiceError> {
        let bill = self.repository.record_payment(bill_id, payment).await?;
        tracing::info!(
            "Recorded {} {} payment on bill {} (now {})",
            format_cents(payment.amount),
            payment.method,
            bill_id,
            bill.status
        );
        Ok(bill)
    }

    pub async fn transactions(&self, bill_id: Option<i64>) -> Result<Vec<Transaction>, ServiceError> {
        self.repository.transactions(bill_id).await
    }

    pub async fn summary(&self) -> Result<TreasurySummary, ServiceError> {
        self.repository.summary().await
    }
}
