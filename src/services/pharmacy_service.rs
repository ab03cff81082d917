use crate::domain::billing::line_total;
use crate::models::{
    BillItemForm, DispenseForm, Medicine, MedicineForm, MedicineQuery, ServiceError,
};
use crate::repositories::{BillingRepository, MedicineRepository, PatientRepository};
use std::sync::Arc;

pub struct PharmacyService {
    repository: Arc<dyn MedicineRepository>,
    billing: Arc<dyn BillingRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl PharmacyService {
    pub fn new(
        repository: Arc<dyn MedicineRepository>,
        billing: Arc<dyn BillingRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self {
            repository,
            billing,
            patients,
        }
    }

    pub async fn list(&self, query: &MedicineQuery) -> Result<Vec<Medicine>, ServiceError> {
        self.repository.find_all(query).await
    }

    pub async fn create(&self, form: &MedicineForm) -> Result<Medicine, ServiceError> {
        if form.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("Medicine name is required".to_string()));
        }
        if form.stock < 0 || form.unit_price < 0 || form.reorder_level < 0 {
            return Err(ServiceError::ValidationError(
                "Stock, price and reorder level cannot be negative".to_string(),
            ));
        }

        let medicine = self.repository.create(form).await?;
        tracing::info!("Added medicine {} with {} units", medicine.name, medicine.stock);
        Ok(medicine)
    }

    pub async fn dispense(&self, id: i64, form: &DispenseForm) -> Result<Medicine, ServiceError> {
        if form.quantity <= 0 {
            return Err(ServiceError::ValidationError("Quantity must be positive".to_string()));
        }
        let medicine = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Medicine {} not found", id)))?;
        if let Some(patient_id) = form.patient_id {
            if self.patients.find_by_id(patient_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("Patient {} not found", patient_id)));
            }
            line_total(form.quantity, medicine.unit_price).map_err(ServiceError::ValidationError)?;
        }

        let updated = self
            .repository
            .adjust_stock(id, -form.quantity)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Only {} units of {} in stock",
                    medicine.stock, medicine.name
                ))
            })?;

        if let Some(patient_id) = form.patient_id {
            let charge = BillItemForm {
                description: format!("{} x{}", medicine.name, form.quantity),
                quantity: form.quantity,
                unit_price: medicine.unit_price,
            };
            if let Err(e) = self.billing.charge_patient(patient_id, &charge).await {
                // Put the units back so stock and billing stay in step
                tracing::error!("Charging patient {} for {} failed: {}", patient_id, medicine.name, e);
                self.repository.adjust_stock(id, form.quantity).await?;
                return Err(e);
            }
        }

        if updated.is_low_stock() {
            tracing::warn!("{} is low on stock ({} left)", updated.name, updated.stock);
        }
        Ok(updated)
    }

    pub async fn restock(&self, id: i64, quantity: i64) -> Result<Medicine, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError("Quantity must be positive".to_string()));
        }

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Medicine {} not found", id)))?;
        if current.stock.checked_add(quantity).is_none() {
            return Err(ServiceError::ValidationError(format!(
                "Restocking {} by {} units is out of range",
                current.name, quantity
            )));
        }

        let medicine = self
            .repository
            .adjust_stock(id, quantity)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Medicine {} not found", id)))?;
        tracing::info!("Restocked {} to {} units", medicine.name, medicine.stock);
        Ok(medicine)
    }
}
