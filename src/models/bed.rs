use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

text_enum! {
    pub enum BedStatus {
        Available => "available",
        Reserved => "reserved",
        Occupied => "occupied",
        Cleaning => "cleaning",
        Maintenance => "maintenance",
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Bed {
    pub id: i64,
    pub label: String,
    pub ward: String,
    #[sqlx(try_from = "String")]
    pub status: BedStatus,
    /// Charge per day in cents
    pub daily_rate: i64,
    pub reserved_for: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Admission {
    pub id: i64,
    pub patient_id: i64,
    pub bed_id: i64,
    pub staff_id: Option<i64>,
    pub reason: Option<String>,
    pub admitted_at: DateTime<Utc>,
    pub discharged_at: Option<DateTime<Utc>>,
    pub bill_id: i64,
}

impl Admission {
    pub fn is_active(&self) -> bool {
        self.discharged_at.is_none()
    }
}
