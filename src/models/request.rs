use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{AppointmentStatus, BedStatus, BillStatus, PaymentMethod, Role};

// =============================================================================
// AUTH & ACCOUNTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub staff_id: Option<i64>,
}

// =============================================================================
// PATIENTS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub blood_group: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PatientUpdateForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientQuery {
    /// Matches name, phone or national id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

// =============================================================================
// STAFF
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hired_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StaffUpdateForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// =============================================================================
// APPOINTMENTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentForm {
    pub patient_id: i64,
    pub staff_id: i64,
    /// Defaults to now (walk-in)
    pub scheduled_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    /// Consultation fee in cents
    #[serde(default)]
    pub fee: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<String>)]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateForm {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsultationPaymentForm {
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

// =============================================================================
// BILLING
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillItemForm {
    pub description: String,
    pub quantity: i64,
    /// Cents
    pub unit_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillForm {
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub items: Vec<BillItemForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentForm {
    /// Cents
    pub amount: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<String>)]
    pub status: Option<BillStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
}

// =============================================================================
// BEDS, ADMISSIONS, PHARMACY, RECORDS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BedForm {
    pub label: String,
    pub ward: String,
    #[serde(default)]
    pub daily_rate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BedStatusForm {
    pub status: BedStatus,
    /// Required when reserving; must match the reservation when admitting
    pub patient_id: Option<i64>,
    /// Attending staff recorded on admission
    pub staff_id: Option<i64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdmissionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MedicineForm {
    pub name: String,
    pub form: Option<String>,
    pub strength: Option<String>,
    #[serde(default)]
    pub stock: i64,
    pub unit_price: i64,
    #[serde(default)]
    pub reorder_level: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MedicineQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispenseForm {
    pub quantity: i64,
    /// Charge the dispensed units to this patient's open bill
    pub patient_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestockForm {
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordQuery {
    pub q: String,
}
