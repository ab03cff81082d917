use crate::domain::billing::{bill_status, validate_payment};
use crate::models::{
    Bill, BillItem, BillItemForm, BillQuery, BillStatus, MethodTotal, PaymentForm, PaymentMethod,
    ServiceError, Transaction, TreasurySummary,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const BILL_COLUMNS: &str =
    "id, patient_id, admission_id, appointment_id, status, total, paid_amount, created_at";

// Building blocks shared with the appointment and bed repositories so that a
// bill can be opened or paid inside their transactions.

pub(crate) async fn insert_bill(
    conn: &mut SqliteConnection,
    patient_id: i64,
    admission_id: Option<i64>,
    appointment_id: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO bills (patient_id, admission_id, appointment_id, status, total, paid_amount, created_at)
         VALUES (?, ?, ?, ?, 0, 0, ?)
         RETURNING id",
    )
    .bind(patient_id)
    .bind(admission_id)
    .bind(appointment_id)
    .bind(BillStatus::Paid.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub(crate) async fn insert_item(
    conn: &mut SqliteConnection,
    bill_id: i64,
    description: &str,
    quantity: i64,
    unit_price: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO bill_items (bill_id, description, quantity, unit_price) VALUES (?, ?, ?, ?)")
        .bind(bill_id)
        .bind(description.trim())
        .bind(quantity)
        .bind(unit_price)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub(crate) async fn insert_transaction(
    conn: &mut SqliteConnection,
    bill_id: i64,
    amount: i64,
    method: PaymentMethod,
    reference: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO transactions (bill_id, amount, method, reference, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(bill_id)
    .bind(amount)
    .bind(method.as_str())
    .bind(reference)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Recomputes total, paid amount and status from items and transactions.
pub(crate) async fn refresh_totals(conn: &mut SqliteConnection, bill_id: i64) -> Result<(), sqlx::Error> {
    let (total, paid) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT
            COALESCE((SELECT SUM(quantity * unit_price) FROM bill_items WHERE bill_id = ?), 0),
            COALESCE((SELECT SUM(amount) FROM transactions WHERE bill_id = ?), 0)",
    )
    .bind(bill_id)
    .bind(bill_id)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("UPDATE bills SET total = ?, paid_amount = ?, status = ? WHERE id = ?")
        .bind(total)
        .bind(paid)
        .bind(bill_status(total, paid).as_str())
        .bind(bill_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub(crate) async fn load_bill(conn: &mut SqliteConnection, bill_id: i64) -> Result<Option<Bill>, sqlx::Error> {
    let bill = sqlx::query_as::<_, Bill>(&format!("SELECT {} FROM bills WHERE id = ?", BILL_COLUMNS))
        .bind(bill_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(mut bill) = bill else {
        return Ok(None);
    };

    bill.items = sqlx::query_as::<_, BillItem>(
        "SELECT id, bill_id, description, quantity, unit_price FROM bill_items WHERE bill_id = ? ORDER BY id",
    )
    .bind(bill_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(bill))
}

async fn require_bill(conn: &mut SqliteConnection, bill_id: i64) -> Result<Bill, ServiceError> {
    load_bill(conn, bill_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", bill_id)))
}

#[async_trait]
pub trait BillingRepository: Send + Sync {
    async fn find_all(&self, query: &BillQuery) -> Result<Vec<Bill>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Bill>, ServiceError>;
    async fn create(
        &self,
        patient_id: i64,
        appointment_id: Option<i64>,
        items: &[BillItemForm],
    ) -> Result<Bill, ServiceError>;
    async fn add_item(&self, bill_id: i64, item: &BillItemForm) -> Result<Bill, ServiceError>;
    async fn record_payment(&self, bill_id: i64, payment: &PaymentForm) -> Result<Bill, ServiceError>;
    /// Adds a charge to the active admission's bill, else to the patient's
    /// newest open bill, opening one if needed.
    async fn charge_patient(&self, patient_id: i64, item: &BillItemForm) -> Result<Bill, ServiceError>;
    async fn transactions(&self, bill_id: Option<i64>) -> Result<Vec<Transaction>, ServiceError>;
    async fn summary(&self) -> Result<TreasurySummary, ServiceError>;
}

pub struct SqliteBillingRepository {
    pool: SqlitePool,
}

impl SqliteBillingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingRepository for SqliteBillingRepository {
    async fn find_all(&self, query: &BillQuery) -> Result<Vec<Bill>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM bills WHERE 1 = 1", BILL_COLUMNS));
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(patient_id) = query.patient_id {
            builder.push(" AND patient_id = ").push_bind(patient_id);
        }
        builder.push(" ORDER BY id DESC");

        let bills = builder
            .build_query_as::<Bill>()
            .fetch_all(&self.pool)
            .await?;

        Ok(bills)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bill>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_bill(&mut conn, id).await?)
    }

    async fn create(
        &self,
        patient_id: i64,
        appointment_id: Option<i64>,
        items: &[BillItemForm],
    ) -> Result<Bill, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let bill_id = insert_bill(&mut tx, patient_id, None, appointment_id).await?;
        for item in items {
            insert_item(&mut tx, bill_id, &item.description, item.quantity, item.unit_price).await?;
        }
        refresh_totals(&mut tx, bill_id).await?;
        let bill = require_bill(&mut tx, bill_id).await?;

        tx.commit().await?;
        Ok(bill)
    }

    async fn add_item(&self, bill_id: i64, item: &BillItemForm) -> Result<Bill, ServiceError> {
        let mut tx = self.pool.begin().await?;

        require_bill(&mut tx, bill_id).await?;
        insert_item(&mut tx, bill_id, &item.description, item.quantity, item.unit_price).await?;
        refresh_totals(&mut tx, bill_id).await?;
        let bill = require_bill(&mut tx, bill_id).await?;

        tx.commit().await?;
        Ok(bill)
    }

    async fn record_payment(&self, bill_id: i64, payment: &PaymentForm) -> Result<Bill, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let bill = require_bill(&mut tx, bill_id).await?;
        validate_payment(&bill, payment.amount).map_err(ServiceError::ValidationError)?;

        insert_transaction(
            &mut tx,
            bill_id,
            payment.amount,
            payment.method,
            payment.reference.as_deref(),
        )
        .await?;
        refresh_totals(&mut tx, bill_id).await?;
        let bill = require_bill(&mut tx, bill_id).await?;

        tx.commit().await?;
        Ok(bill)
    }

    async fn charge_patient(&self, patient_id: i64, item: &BillItemForm) -> Result<Bill, ServiceError> {
        let mut tx = self.pool.begin().await?;

        // While admitted, charges go on the admission bill even if it was settled
        let admission_bill = sqlx::query_scalar::<_, i64>(
            "SELECT bill_id FROM admissions
             WHERE patient_id = ? AND discharged_at IS NULL
             ORDER BY id DESC LIMIT 1",
        )
        .bind(patient_id)
        .fetch_optional(&mut *tx)
        .await?;

        let open = match admission_bill {
            Some(id) => Some(id),
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM bills
                     WHERE patient_id = ? AND status != ? AND appointment_id IS NULL
                     ORDER BY id DESC LIMIT 1",
                )
                .bind(patient_id)
                .bind(BillStatus::Paid.as_str())
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let bill_id = match open {
            Some(id) => id,
            None => insert_bill(&mut tx, patient_id, None, None).await?,
        };
        insert_item(&mut tx, bill_id, &item.description, item.quantity, item.unit_price).await?;
        refresh_totals(&mut tx, bill_id).await?;
        let bill = require_bill(&mut tx, bill_id).await?;

        tx.commit().await?;
        Ok(bill)
    }

    async fn transactions(&self, bill_id: Option<i64>) -> Result<Vec<Transaction>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, bill_id, amount, method, reference, created_at FROM transactions WHERE 1 = 1",
        );
        if let Some(bill_id) = bill_id {
            builder.push(" AND bill_id = ").push_bind(bill_id);
        }
        builder.push(" ORDER BY id DESC");

        let transactions = builder
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    async fn summary(&self) -> Result<TreasurySummary, ServiceError> {
        let (total_billed, total_collected, unpaid_bills) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COALESCE(SUM(total), 0),
                    COALESCE(SUM(paid_amount), 0),
                    COALESCE(SUM(CASE WHEN status != 'paid' THEN 1 ELSE 0 END), 0)
             FROM bills",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_method = sqlx::query_as::<_, MethodTotal>(
            "SELECT method, SUM(amount) AS amount, COUNT(*) AS count
             FROM transactions GROUP BY method ORDER BY method",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(TreasurySummary {
            total_billed,
            total_collected,
            outstanding: (total_billed - total_collected).max(0),
            unpaid_bills,
            by_method,
        })
    }
}
