use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub form: Option<String>,
    pub strength: Option<String>,
    pub stock: i64,
    /// Price per unit in cents
    pub unit_price: i64,
    pub reorder_level: i64,
}

impl Medicine {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_level
    }
}
