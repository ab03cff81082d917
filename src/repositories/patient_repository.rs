use crate::models::{Patient, PatientForm, ServiceError};
use crate::repositories::like_pattern;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, phone, address, \
                               national_id, blood_group, created_at";

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, ServiceError>;
    async fn search(&self, term: Option<&str>) -> Result<Vec<Patient>, ServiceError>;
    async fn create(&self, form: &PatientForm) -> Result<Patient, ServiceError>;
    async fn update(&self, patient: &Patient) -> Result<(), ServiceError>;
    async fn count(&self) -> Result<i64, ServiceError>;
}

pub struct SqlitePatientRepository {
    pool: SqlitePool,
}

impl SqlitePatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM patients WHERE id = ?",
            PATIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<Patient>, ServiceError> {
        let term = term.map(str::trim).filter(|t| !t.is_empty());

        let patients = match term {
            Some(term) => {
                let pattern = like_pattern(term);
                sqlx::query_as::<_, Patient>(&format!(
                    "SELECT {} FROM patients
                     WHERE (first_name || ' ' || last_name) LIKE ? ESCAPE '\\'
                        OR phone LIKE ? ESCAPE '\\'
                        OR national_id LIKE ? ESCAPE '\\'
                        OR CAST(id AS TEXT) = ?
                     ORDER BY last_name, first_name",
                    PATIENT_COLUMNS
                ))
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Patient>(&format!(
                    "SELECT {} FROM patients ORDER BY last_name, first_name",
                    PATIENT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(patients)
    }

    async fn create(&self, form: &PatientForm) -> Result<Patient, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "INSERT INTO patients (first_name, last_name, date_of_birth, gender, phone, address,
                                   national_id, blood_group, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            PATIENT_COLUMNS
        ))
        .bind(form.first_name.trim())
        .bind(form.last_name.trim())
        .bind(form.date_of_birth)
        .bind(&form.gender)
        .bind(&form.phone)
        .bind(&form.address)
        .bind(&form.national_id)
        .bind(&form.blood_group)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn update(&self, patient: &Patient) -> Result<(), ServiceError> {
        sqlx::query(
            "UPDATE patients SET first_name = ?, last_name = ?, date_of_birth = ?, gender = ?,
                    phone = ?, address = ?, national_id = ?, blood_group = ?
             WHERE id = ?",
        )
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(&patient.national_id)
        .bind(&patient.blood_group)
        .bind(patient.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
