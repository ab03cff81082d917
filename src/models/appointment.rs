use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

text_enum! {
    pub enum AppointmentStatus {
        Waiting => "waiting",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    pub enum PaymentStatus {
        Unpaid => "unpaid",
        Paid => "paid",
    }
}

impl AppointmentStatus {
    /// Still part of the live queue.
    pub fn is_open(&self) -> bool {
        matches!(self, AppointmentStatus::Waiting | AppointmentStatus::InProgress)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub staff_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    /// Consultation fee in cents
    pub fee: i64,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
