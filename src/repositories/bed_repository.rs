use crate::domain::beds::BedAction;
use crate::models::{
    Admission, AdmissionQuery, Bed, BedCount, BedForm, BedStatus, ServiceError,
};
use crate::repositories::billing_repository::{insert_bill, insert_item, refresh_totals};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const BED_COLUMNS: &str = "id, label, ward, status, daily_rate, reserved_for";
const ADMISSION_COLUMNS: &str =
    "id, patient_id, bed_id, staff_id, reason, admitted_at, discharged_at, bill_id";

/// Who admitted the patient and why; only read by `BedAction::Admit`.
#[derive(Debug, Clone, Default)]
pub struct AdmissionDetails {
    pub staff_id: Option<i64>,
    pub reason: Option<String>,
}

/// A bed other than `except_bed` that the patient occupies or has reserved.
async fn held_bed(
    conn: &mut SqliteConnection,
    patient_id: i64,
    except_bed: i64,
) -> Result<Option<Bed>, sqlx::Error> {
    sqlx::query_as::<_, Bed>(&format!(
        "SELECT {} FROM beds
         WHERE id != ?
           AND (reserved_for = ?
                OR id IN (SELECT bed_id FROM admissions WHERE patient_id = ? AND discharged_at IS NULL))
         LIMIT 1",
        BED_COLUMNS
    ))
    .bind(except_bed)
    .bind(patient_id)
    .bind(patient_id)
    .fetch_optional(&mut *conn)
    .await
}

pub(crate) fn already_placed(patient_id: i64, bed: &Bed) -> ServiceError {
    ServiceError::Conflict(format!(
        "Patient {} already holds bed {} ({})",
        patient_id, bed.label, bed.status
    ))
}

#[async_trait]
pub trait BedRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Bed>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Bed>, ServiceError>;
    async fn create(&self, form: &BedForm) -> Result<Bed, ServiceError>;
    async fn count_by_status(&self) -> Result<Vec<BedCount>, ServiceError>;
    async fn active_admission(&self, bed_id: i64) -> Result<Option<Admission>, ServiceError>;
    async fn admissions(&self, query: &AdmissionQuery) -> Result<Vec<Admission>, ServiceError>;
    /// The bed, other than `except_bed`, reserved for or occupied by the patient.
    async fn held_by(&self, patient_id: i64, except_bed: i64) -> Result<Option<Bed>, ServiceError>;
    /// Applies a planned transition atomically. The bed must still be in
    /// `bed.status`, otherwise a conflict is reported.
    async fn apply(
        &self,
        bed: &Bed,
        action: BedAction,
        details: &AdmissionDetails,
    ) -> Result<Bed, ServiceError>;
}

pub struct SqliteBedRepository {
    pool: SqlitePool,
}

impl SqliteBedRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BedRepository for SqliteBedRepository {
    async fn find_all(&self) -> Result<Vec<Bed>, ServiceError> {
        let beds = sqlx::query_as::<_, Bed>(&format!(
            "SELECT {} FROM beds ORDER BY ward, label",
            BED_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(beds)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bed>, ServiceError> {
        let bed = sqlx::query_as::<_, Bed>(&format!("SELECT {} FROM beds WHERE id = ?", BED_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bed)
    }

    async fn create(&self, form: &BedForm) -> Result<Bed, ServiceError> {
        let bed = sqlx::query_as::<_, Bed>(&format!(
            "INSERT INTO beds (label, ward, status, daily_rate) VALUES (?, ?, ?, ?) RETURNING {}",
            BED_COLUMNS
        ))
        .bind(form.label.trim())
        .bind(form.ward.trim())
        .bind(BedStatus::Available.as_str())
        .bind(form.daily_rate)
        .fetch_one(&self.pool)
        .await?;

        Ok(bed)
    }

    async fn count_by_status(&self) -> Result<Vec<BedCount>, ServiceError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM beds GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        // Every status is reported, including empty ones, in state-machine order
        let counts = BedStatus::ALL
            .iter()
            .map(|status| BedCount {
                status: *status,
                count: rows
                    .iter()
                    .find(|(s, _)| s == status.as_str())
                    .map(|(_, c)| *c)
                    .unwrap_or(0),
            })
            .collect();

        Ok(counts)
    }

    async fn active_admission(&self, bed_id: i64) -> Result<Option<Admission>, ServiceError> {
        let admission = sqlx::query_as::<_, Admission>(&format!(
            "SELECT {} FROM admissions WHERE bed_id = ? AND discharged_at IS NULL",
            ADMISSION_COLUMNS
        ))
        .bind(bed_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admission)
    }

    async fn admissions(&self, query: &AdmissionQuery) -> Result<Vec<Admission>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM admissions WHERE 1 = 1",
            ADMISSION_COLUMNS
        ));
        match query.active {
            Some(true) => {
                builder.push(" AND discharged_at IS NULL");
            }
            Some(false) => {
                builder.push(" AND discharged_at IS NOT NULL");
            }
            None => {}
        }
        if let Some(patient_id) = query.patient_id {
            builder.push(" AND patient_id = ").push_bind(patient_id);
        }
        builder.push(" ORDER BY admitted_at DESC, id DESC");

        let admissions = builder
            .build_query_as::<Admission>()
            .fetch_all(&self.pool)
            .await?;

        Ok(admissions)
    }

    async fn held_by(&self, patient_id: i64, except_bed: i64) -> Result<Option<Bed>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(held_bed(&mut conn, patient_id, except_bed).await?)
    }

    async fn apply(
        &self,
        bed: &Bed,
        action: BedAction,
        details: &AdmissionDetails,
    ) -> Result<Bed, ServiceError> {
        let mut tx = self.pool.begin().await?;

        // One bed per patient, checked again under the write
        if let BedAction::Reserve { patient_id } | BedAction::Admit { patient_id } = action {
            if let Some(other) = held_bed(&mut tx, patient_id, bed.id).await? {
                return Err(already_placed(patient_id, &other));
            }
        }

        let reserved_for = match action {
            BedAction::Reserve { patient_id } => Some(patient_id),
            _ => None,
        };

        let result = sqlx::query("UPDATE beds SET status = ?, reserved_for = ? WHERE id = ? AND status = ?")
            .bind(action.target().as_str())
            .bind(reserved_for)
            .bind(bed.id)
            .bind(bed.status.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() != 1 {
            return Err(ServiceError::Conflict(format!(
                "Bed {} changed while the request was processed; reload and try again",
                bed.label
            )));
        }

        match action {
            BedAction::Admit { patient_id } => {
                let now = Utc::now();
                let bill_id = insert_bill(&mut tx, patient_id, None, None).await?;
                if bed.daily_rate > 0 {
                    insert_item(
                        &mut tx,
                        bill_id,
                        &format!("Bed {} ({}) - day 1", bed.label, bed.ward),
                        1,
                        bed.daily_rate,
                    )
                    .await?;
                }
                refresh_totals(&mut tx, bill_id).await?;

                let admission_id = sqlx::query_scalar::<_, i64>(
                    "INSERT INTO admissions (patient_id, bed_id, staff_id, reason, admitted_at, bill_id)
                     VALUES (?, ?, ?, ?, ?, ?)
                     RETURNING id",
                )
                .bind(patient_id)
                .bind(bed.id)
                .bind(details.staff_id)
                .bind(&details.reason)
                .bind(now)
                .bind(bill_id)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("UPDATE bills SET admission_id = ? WHERE id = ?")
                    .bind(admission_id)
                    .bind(bill_id)
                    .execute(&mut *tx)
                    .await?;
            }
            BedAction::Discharge => {
                // Settlement is re-checked here; a charge may have landed after planning
                let unsettled = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM admissions a JOIN bills b ON b.id = a.bill_id
                     WHERE a.bed_id = ? AND a.discharged_at IS NULL AND b.paid_amount < b.total",
                )
                .bind(bed.id)
                .fetch_one(&mut *tx)
                .await?;

                if unsettled > 0 {
                    return Err(ServiceError::ValidationError(format!(
                        "The admission bill for bed {} must be settled before discharge",
                        bed.label
                    )));
                }

                sqlx::query("UPDATE admissions SET discharged_at = ? WHERE bed_id = ? AND discharged_at IS NULL")
                    .bind(Utc::now())
                    .bind(bed.id)
                    .execute(&mut *tx)
                    .await?;
            }
            _ => {}
        }

        let updated = sqlx::query_as::<_, Bed>(&format!("SELECT {} FROM beds WHERE id = ?", BED_COLUMNS))
            .bind(bed.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
