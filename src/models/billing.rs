use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

text_enum! {
    pub enum BillStatus {
        Unpaid => "unpaid",
        Partial => "partial",
        Paid => "paid",
    }
}

text_enum! {
    pub enum PaymentMethod {
        Cash => "cash",
        Card => "card",
        Insurance => "insurance",
        Transfer => "transfer",
    }
}

/// A patient bill. Amounts are in cents.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Bill {
    pub id: i64,
    pub patient_id: i64,
    pub admission_id: Option<i64>,
    pub appointment_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: BillStatus,
    pub total: i64,
    pub paid_amount: i64,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<BillItem>,
}

impl Bill {
    pub fn outstanding(&self) -> i64 {
        (self.total - self.paid_amount).max(0)
    }

    pub fn is_settled(&self) -> bool {
        self.paid_amount >= self.total
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl BillItem {
    pub fn line_total(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub bill_id: i64,
    pub amount: i64,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Treasury totals across all bills, in cents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TreasurySummary {
    pub total_billed: i64,
    pub total_collected: i64,
    pub outstanding: i64,
    pub unpaid_bills: i64,
    pub by_method: Vec<MethodTotal>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct MethodTotal {
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    pub amount: i64,
    pub count: i64,
}
