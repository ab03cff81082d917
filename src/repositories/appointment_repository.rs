use crate::models::{
    Appointment, AppointmentForm, AppointmentQuery, AppointmentStatus, PaymentMethod,
    PaymentStatus, ServiceError,
};
use crate::repositories::billing_repository::{insert_bill, insert_item, insert_transaction, refresh_totals};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const APPOINTMENT_COLUMNS: &str = "id, patient_id, staff_id, scheduled_at, reason, status, \
                                   payment_status, fee, created_at, started_at, completed_at";

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, ServiceError>;
    async fn find_open(&self, staff_id: Option<i64>) -> Result<Vec<Appointment>, ServiceError>;
    async fn create(
        &self,
        form: &AppointmentForm,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Appointment, ServiceError>;
    /// Moves a waiting appointment into consultation unless the provider
    /// already has one. Returns false when the guard rejected the update.
    async fn start(&self, id: i64) -> Result<bool, ServiceError>;
    async fn complete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn cancel(&self, id: i64) -> Result<bool, ServiceError>;
    /// Marks the appointment paid and books the fee as a settled bill.
    async fn mark_paid(
        &self,
        appointment: &Appointment,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<bool, ServiceError>;
}

pub struct SqliteAppointmentRepository {
    pool: SqlitePool,
}

impl SqliteAppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    async fn find(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM appointments WHERE 1 = 1",
            APPOINTMENT_COLUMNS
        ));
        if let Some(staff_id) = query.staff_id {
            builder.push(" AND staff_id = ").push_bind(staff_id);
        }
        if let Some(patient_id) = query.patient_id {
            builder.push(" AND patient_id = ").push_bind(patient_id);
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY scheduled_at, id");

        let mut appointments = builder
            .build_query_as::<Appointment>()
            .fetch_all(&self.pool)
            .await?;

        // Dates are compared in UTC on the decoded value rather than in SQL
        if let Some(date) = query.date {
            appointments.retain(|a| a.scheduled_at.date_naive() == date);
        }

        Ok(appointments)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, ServiceError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {} FROM appointments WHERE id = ?",
            APPOINTMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn find_open(&self, staff_id: Option<i64>) -> Result<Vec<Appointment>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM appointments WHERE status IN (",
            APPOINTMENT_COLUMNS
        ));
        builder
            .push_bind(AppointmentStatus::Waiting.as_str())
            .push(", ")
            .push_bind(AppointmentStatus::InProgress.as_str())
            .push(")");
        if let Some(staff_id) = staff_id {
            builder.push(" AND staff_id = ").push_bind(staff_id);
        }
        builder.push(" ORDER BY id");

        let appointments = builder
            .build_query_as::<Appointment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(appointments)
    }

    async fn create(
        &self,
        form: &AppointmentForm,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Appointment, ServiceError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments (patient_id, staff_id, scheduled_at, reason, status,
                                       payment_status, fee, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            APPOINTMENT_COLUMNS
        ))
        .bind(form.patient_id)
        .bind(form.staff_id)
        .bind(scheduled_at)
        .bind(&form.reason)
        .bind(AppointmentStatus::Waiting.as_str())
        .bind(PaymentStatus::Unpaid.as_str())
        .bind(form.fee)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn start(&self, id: i64) -> Result<bool, ServiceError> {
        // Single statement so two concurrent starts for one provider cannot both win
        let result = sqlx::query(
            "UPDATE appointments SET status = ?, started_at = ?
             WHERE id = ? AND status = ? AND payment_status = ?
               AND NOT EXISTS (
                   SELECT 1 FROM appointments other
                   WHERE other.staff_id = appointments.staff_id
                     AND other.status = ?
                     AND other.id != appointments.id
               )",
        )
        .bind(AppointmentStatus::InProgress.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(AppointmentStatus::Waiting.as_str())
        .bind(PaymentStatus::Paid.as_str())
        .bind(AppointmentStatus::InProgress.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn complete(&self, id: i64) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "UPDATE appointments SET status = ?, completed_at = ? WHERE id = ? AND status = ?",
        )
        .bind(AppointmentStatus::Completed.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(AppointmentStatus::InProgress.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn cancel(&self, id: i64) -> Result<bool, ServiceError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ? AND status = ?")
            .bind(AppointmentStatus::Cancelled.as_str())
            .bind(id)
            .bind(AppointmentStatus::Waiting.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_paid(
        &self,
        appointment: &Appointment,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<bool, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE appointments SET payment_status = ?
             WHERE id = ? AND payment_status = ? AND status != ?",
        )
        .bind(PaymentStatus::Paid.as_str())
        .bind(appointment.id)
        .bind(PaymentStatus::Unpaid.as_str())
        .bind(AppointmentStatus::Cancelled.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != 1 {
            return Ok(false);
        }

        if appointment.fee > 0 {
            let bill_id = insert_bill(&mut tx, appointment.patient_id, None, Some(appointment.id)).await?;
            insert_item(&mut tx, bill_id, "Consultation fee", 1, appointment.fee).await?;
            insert_transaction(&mut tx, bill_id, appointment.fee, method, reference).await?;
            refresh_totals(&mut tx, bill_id).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
