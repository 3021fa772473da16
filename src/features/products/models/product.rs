use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for product
///
/// `category_id` is a weak reference: the category may have been deleted,
/// readers must tolerate a dangling id.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category_id: Option<Uuid>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}
