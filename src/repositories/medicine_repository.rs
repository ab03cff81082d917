use crate::models::{Medicine, MedicineForm, MedicineQuery, ServiceError};
use crate::repositories::like_pattern;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const MEDICINE_COLUMNS: &str = "id, name, form, strength, stock, unit_price, reorder_level";

#[async_trait]
pub trait MedicineRepository: Send + Sync {
    async fn find_all(&self, query: &MedicineQuery) -> Result<Vec<Medicine>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Medicine>, ServiceError>;
    async fn create(&self, form: &MedicineForm) -> Result<Medicine, ServiceError>;
    /// Adds `delta` to the stock. Returns None when the result would be negative.
    async fn adjust_stock(&self, id: i64, delta: i64) -> Result<Option<Medicine>, ServiceError>;
}

pub struct SqliteMedicineRepository {
    pool: SqlitePool,
}

impl SqliteMedicineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicineRepository for SqliteMedicineRepository {
    async fn find_all(&self, query: &MedicineQuery) -> Result<Vec<Medicine>, ServiceError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM medicines WHERE 1 = 1",
            MEDICINE_COLUMNS
        ));
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            builder
                .push(" AND name LIKE ")
                .push_bind(like_pattern(search))
                .push(" ESCAPE '\\'");
        }
        if query.low_stock == Some(true) {
            builder.push(" AND stock <= reorder_level");
        }
        builder.push(" ORDER BY name");

        let medicines = builder
            .build_query_as::<Medicine>()
            .fetch_all(&self.pool)
            .await?;

        Ok(medicines)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Medicine>, ServiceError> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!(
            "SELECT {} FROM medicines WHERE id = ?",
            MEDICINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    async fn create(&self, form: &MedicineForm) -> Result<Medicine, ServiceError> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!(
            "INSERT INTO medicines (name, form, strength, stock, unit_price, reorder_level)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {}",
            MEDICINE_COLUMNS
        ))
        .bind(form.name.trim())
        .bind(&form.form)
        .bind(&form.strength)
        .bind(form.stock)
        .bind(form.unit_price)
        .bind(form.reorder_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(medicine)
    }

    async fn adjust_stock(&self, id: i64, delta: i64) -> Result<Option<Medicine>, ServiceError> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!(
            "UPDATE medicines SET stock = stock + ? WHERE id = ? AND stock + ? >= 0 RETURNING {}",
            MEDICINE_COLUMNS
        ))
        .bind(delta)
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }
}
