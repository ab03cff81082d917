use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    Admission, Appointment, Bill, BedStatus, Medicine, Patient, UserProfile,
};

// Common response types
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Success envelope: every payload travels under `data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

// Authentication responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub expires_in: u64, // seconds
    pub user: UserProfile,
}

/// One row of the ordered waiting queue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueueEntry {
    pub position: usize,
    pub group: u8,
    pub patient_name: String,
    pub appointment: Appointment,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BedCount {
    pub status: BedStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub patients: i64,
    pub waiting: usize,
    pub in_progress: usize,
    pub beds: Vec<BedCount>,
    pub outstanding: i64,
    pub low_stock: Vec<Medicine>,
}

/// Everything known about one patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    pub admissions: Vec<Admission>,
    pub bills: Vec<Bill>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SystemStatus {
    pub database: bool,
    pub version: String,
}
